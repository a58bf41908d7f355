// SPDX-License-Identifier: MIT

use std::fmt;

use pingd_core::HostId;

/// A line written back to a controller, either as a direct reply to one of
/// its commands or as an asynchronously broadcast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ok,
    Failed,
    /// Echoes the original (untrimmed of surrounding content already
    /// stripped by the reader) line verbatim.
    Error(String),
    ErrorDuplicateId,
    ErrorDuplicateRequest,
    ErrorNoServer,
    ErrorAlreadyDefunct,
    Disconnecting,
    ShuttingDown,
    /// Broadcast by the Notifier when a host escalates into the flagged
    /// failure state.
    Noping { id: HostId, name: String },
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => write!(f, "OK"),
            Response::Failed => write!(f, "failed"),
            Response::Error(line) => write!(f, "ERROR {line}"),
            Response::ErrorDuplicateId => write!(f, "ERROR DUPLICATE ID"),
            Response::ErrorDuplicateRequest => write!(f, "ERROR DUPLICATE REQUEST"),
            Response::ErrorNoServer => write!(f, "ERROR NO SERVER"),
            Response::ErrorAlreadyDefunct => write!(f, "ERROR ALREADY DEFUNCT"),
            Response::Disconnecting => write!(f, "DISCONNECTING"),
            Response::ShuttingDown => write!(f, "SHUTTING DOWN"),
            Response::Noping { id, name } => write!(f, "NOPING {id} {name}"),
        }
    }
}

impl Response {
    /// The line as written to the socket, LF-terminated.
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
