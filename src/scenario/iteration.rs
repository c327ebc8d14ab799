//! One virtual-user action: request, response checks, error sample

use reqwest::header::HOST;

use crate::metrics::ErrorSink;

use super::hosts::expected_fragment;

/// What one request produced, reduced to the fields the checks care about.
///
/// Transport failures become an observation with no status and no body rather
/// than an error; a failed request is recorded, never raised.
#[derive(Debug, Clone, Default)]
pub struct Observation {
    pub status: Option<u16>,
    pub body: Option<String>,
}

/// Outcome of the two independent response predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checks {
    pub status_ok: bool,
    pub content_ok: bool,
}

impl Checks {
    /// True only when both predicates hold.
    pub fn success(self) -> bool {
        self.status_ok && self.content_ok
    }
}

/// Evaluates the response predicates for the host this iteration targeted.
///
/// The content check requires the body to contain the fragment identifying
/// the routed host; an absent body fails the check.
pub fn evaluate(host: &str, observation: &Observation) -> Checks {
    let status_ok = observation.status == Some(200);
    let content_ok = observation
        .body
        .as_deref()
        .is_some_and(|body| body.contains(expected_fragment(host)));

    Checks {
        status_ok,
        content_ok,
    }
}

/// Applies the checks for a finished request and emits the error sample.
///
/// The sample is the inverted success flag: `true` means this iteration
/// counts toward the error rate.
pub fn observe(host: &str, observation: &Observation, sink: &dyn ErrorSink) -> Checks {
    let checks = evaluate(host, observation);
    sink.record(!checks.success());
    checks
}

/// Issues one GET to the target with the routed Host header.
pub async fn fetch(client: &reqwest::Client, target: &str, host: &str) -> Observation {
    let response = match client.get(target).header(HOST, host).send().await {
        Ok(response) => response,
        Err(error) => {
            tracing::debug!("request to {} as {} failed: {}", target, host, error);
            return Observation::default();
        }
    };

    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => Some(body),
        Err(error) => {
            tracing::debug!("reading body from {} failed: {}", host, error);
            None
        }
    };

    Observation {
        status: Some(status),
        body,
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        samples: Mutex<Vec<bool>>,
    }

    impl ErrorSink for RecordingSink {
        fn record(&self, error: bool) {
            self.samples.lock().unwrap().push(error);
        }
    }

    fn response(status: u16, body: Option<&str>) -> Observation {
        Observation {
            status: Some(status),
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn matching_body_and_status_succeed() {
        let checks = evaluate("foo.localhost", &response(200, Some("hello foo world")));
        assert!(checks.status_ok);
        assert!(checks.content_ok);
        assert!(checks.success());
    }

    #[test]
    fn wrong_backend_fragment_fails_the_content_check() {
        let checks = evaluate("bar.localhost", &response(200, Some("hello foo world")));
        assert!(checks.status_ok);
        assert!(!checks.content_ok);
        assert!(!checks.success());
    }

    #[test]
    fn absent_body_fails_the_content_check_without_raising() {
        let checks = evaluate("foo.localhost", &response(503, None));
        assert!(!checks.status_ok);
        assert!(!checks.content_ok);
    }

    #[test]
    fn non_200_fails_regardless_of_body() {
        let checks = evaluate("foo.localhost", &response(500, Some("hello foo world")));
        assert!(!checks.status_ok);
        assert!(checks.content_ok);
        assert!(!checks.success());
    }

    #[test]
    fn transport_failure_fails_both_checks() {
        let checks = evaluate("foo.localhost", &Observation::default());
        assert!(!checks.status_ok);
        assert!(!checks.content_ok);
    }

    #[test]
    fn observe_records_the_inverted_success_flag() {
        let sink = RecordingSink::default();

        observe("foo.localhost", &response(200, Some("hello foo world")), &sink);
        observe("bar.localhost", &response(200, Some("hello foo world")), &sink);
        observe("foo.localhost", &response(503, None), &sink);

        assert_eq!(*sink.samples.lock().unwrap(), vec![false, true, true]);
    }

    fn serve_once(response: &'static str) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            stream.write_all(response.as_bytes()).unwrap();
        });

        addr
    }

    #[tokio::test]
    async fn fetch_captures_status_and_body() {
        let addr = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 15\r\nConnection: close\r\n\r\nhello foo world",
        );
        let client = reqwest::Client::new();

        let observation = fetch(&client, &format!("http://{addr}/"), "foo.localhost").await;

        assert_eq!(observation.status, Some(200));
        assert_eq!(observation.body.as_deref(), Some("hello foo world"));
    }

    #[tokio::test]
    async fn fetch_folds_connection_errors_into_an_empty_observation() {
        // Bind then drop so the port is very likely unoccupied.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = reqwest::Client::new();

        let observation = fetch(&client, &format!("http://{addr}/"), "foo.localhost").await;

        assert_eq!(observation.status, None);
        assert_eq!(observation.body, None);
    }
}
