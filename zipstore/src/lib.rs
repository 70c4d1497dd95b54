mod archive;
mod bin;
mod builder;
pub mod ext;
pub mod naming;

pub use archive::*;
pub use bin::*;
pub use builder::*;

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

const READ_WRITE_BUF_SIZE: usize = 4 * 1024 * 1024;

#[derive(thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] zipstore_core::Error),

    #[error("{context}{}", fmt_path(.path))]
    Io {
        #[source]
        source: io::Error,
        path: Option<PathBuf>,
        context: &'static str,
    },

    #[error("Entry {}", String::from_utf8_lossy(.name))]
    Entry {
        name: Vec<u8>,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid path component {} in entry {}", .component.display(), .entry.display())]
    InvalidPath { entry: PathBuf, component: PathBuf },

    #[error("Entry size mismatch: expected {expected}, got {actual}")]
    LengthMismatch { actual: u64, expected: u64 },
}

fn fmt_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" at path {}", path.display()),
        None => String::new(),
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;

        let mut source = self.source();
        while let Some(err) = source {
            writeln!(f, "\tCaused by: {err}")?;
            source = err.source();
        }

        Ok(())
    }
}

/// Build a closure mapping an `io::Error` into [`Error::Io`], for `map_err`.
#[macro_export]
macro_rules! wrap_io_err {
    ($context:expr) => {
        |source| $crate::Error::Io {
            source,
            path: None,
            context: $context,
        }
    };
    ($path:expr, $context:expr) => {
        |source| $crate::Error::Io {
            source,
            path: Some(::std::path::PathBuf::from(&$path)),
            context: $context,
        }
    };
}
