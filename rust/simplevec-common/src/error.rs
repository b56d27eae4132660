use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn out_of_range(index: usize, size: usize) -> Error {
        Error(ErrorKind::OutOfRange { index, size }.into())
    }

    pub fn alloc(requested: usize, source: TryReserveError) -> Error {
        Error(ErrorKind::Alloc { requested, source }.into())
    }

    /// Returns `true` if this is an out-of-range access error.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind(), ErrorKind::OutOfRange { .. })
    }

    /// Returns `true` if this is an allocation failure.
    pub fn is_alloc(&self) -> bool {
        matches!(self.kind(), ErrorKind::Alloc { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("index {index} is out of range for vector of size {size}")]
    OutOfRange { index: usize, size: usize },

    #[error("failed to allocate {requested} slots")]
    Alloc {
        requested: usize,
        source: TryReserveError,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
