//! Optional redirection of log output into an append-only file

use crate::logging::{Logger, OutputTarget};
use crate::{Error, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

const MODULE: &str = "logging";

/// Scope guard owning the log file while it is the logger's output target.
///
/// Dropping the guard restores the previous target, closes the file and
/// logs `close log file` on the restored target. The release runs once.
pub struct LogRedirect {
    logger: Logger,
    path: PathBuf,
    previous: Option<OutputTarget>,
}

impl LogRedirect {
    /// Redirect `logger` into the file at `path`.
    ///
    /// An absent or empty path is a no-op and yields `Ok(None)`. The file is
    /// created when missing and always appended to.
    pub fn open(logger: &Logger, path: Option<&Path>) -> Result<Option<Self>> {
        let Some(path) = path.filter(|path| !path.as_os_str().is_empty()) else {
            return Ok(None);
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| Error::LogOpen {
                path: path.to_path_buf(),
                source,
            })?;

        let previous = logger.swap_output(Box::new(file));
        logger.info(MODULE, format!("write log to file: {}", path.display()));

        Ok(Some(Self {
            logger: logger.clone(),
            path: path.to_path_buf(),
            previous: Some(previous),
        }))
    }

    /// The file log output currently goes to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore the previous output target and close the file
    pub fn release(mut self) {
        self.restore();
    }

    fn restore(&mut self) {
        if let Some(previous) = self.previous.take() {
            drop(self.logger.swap_output(previous));
            self.logger.info(MODULE, "close log file");
        }
    }
}

impl Drop for LogRedirect {
    fn drop(&mut self) {
        self.restore();
    }
}
