//! Logging facade and log file redirection

pub mod logger;
pub mod redirect;

pub use logger::{Logger, OutputTarget, Severity};
pub use redirect::LogRedirect;
