//! Logging setup and tracing of indicator updates.

mod logging;
mod watch;

pub use logging::{build_filter, setup_logging, setup_logging_from};
pub use watch::{watch, watch_set, watch_shared};
