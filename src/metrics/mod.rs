// Metrics module
// Collection, live reporting, and metric types

pub mod collector;
pub mod reporter;
pub mod types;

pub use collector::ErrorSink;
