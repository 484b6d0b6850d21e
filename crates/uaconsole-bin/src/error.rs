// SPDX-License-Identifier: MIT
// Copyright (c) 2025 UAConsole contributors.

//! Error types for the UAConsole binary.

use thiserror::Error;

/// Result type alias for binary operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that surface to the process exit path.
#[derive(Debug, Error)]
pub enum BinError {
    /// Client-layer error (configuration, connection, sink).
    #[error("{0}")]
    Client(#[from] uaconsole_opcua::UaError),

    /// I/O error outside the client layer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BinError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Client(err) if err.is_fatal() => 1,
            Self::Client(_) => 2,
            Self::Io(_) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uaconsole_opcua::{ConnectionError, UaError};

    #[test]
    fn test_exit_codes() {
        let fatal = BinError::from(UaError::connection(ConnectionError::NotConnected));
        assert_eq!(fatal.exit_code(), 1);

        let io = BinError::from(std::io::Error::other("sink closed"));
        assert_eq!(io.exit_code(), 3);
    }
}
