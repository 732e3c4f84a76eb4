// SPDX-License-Identifier: MIT

use core::fmt;

/// Result type for VsIO operations.
pub type VsIOResult<T = ()> = core::result::Result<T, VsIOError>;

/// Error type for VsIO operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VsIOError {
    Other(&'static str),
    OutOfBounds,
    Unsupported,
    Invalid(&'static str),
}

impl VsIOError {
    pub fn msg(&self) -> &'static str {
        match self {
            VsIOError::Other(msg) => msg,
            VsIOError::OutOfBounds => "Out of bounds",
            VsIOError::Unsupported => "Unsupported operation",
            VsIOError::Invalid(msg) => msg,
        }
    }
}

impl From<&'static str> for VsIOError {
    #[inline]
    fn from(msg: &'static str) -> Self {
        VsIOError::Other(msg)
    }
}

impl fmt::Display for VsIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VsIOError {}
