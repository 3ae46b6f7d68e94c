pub mod backoff;
pub mod tracing;
