use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Errors that can occur when encoding or decoding binary data, or when
/// coercing a value through one of the `set_*` methods.
#[derive(Debug)]
pub struct Error {
    /// Box the cause to keep `Result<T>` small in the common success path.
    cause: Box<Cause>,
}

#[derive(Debug)]
enum Cause {
    Io(io::Error),
    Owned(Box<str>),
    Static(&'static str),
}

impl Error {
    pub(crate) fn new_owned(msg: impl Into<Box<str>>) -> Self {
        Self {
            cause: Box::new(Cause::Owned(msg.into())),
        }
    }

    pub(crate) fn new_static(msg: &'static str) -> Self {
        Self {
            cause: Box::new(Cause::Static(msg)),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.cause {
            Cause::Io(e) => e.fmt(f),
            Cause::Owned(msg) => f.write_str(msg),
            Cause::Static(msg) => f.write_str(msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &*self.cause {
            Cause::Io(e) => Some(e),
            Cause::Owned(_) | Cause::Static(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self {
            cause: Box::new(Cause::Io(e)),
        }
    }
}

/// The result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
