// SPDX-License-Identifier: MIT

use pingd_core::HostId;

/// A command sent by a controller on one line of the control channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { id: HostId, name: String },
    Remove { id: HostId },
    MarkDefunct { id: HostId },
    Disconnect,
    Shutdown,
}

/// The line did not parse as any known command. The caller already has the
/// original line in hand and echoes it back verbatim in the `ERROR` response,
/// so this carries no payload of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("malformed command line")]
pub struct ParseError;

impl Command {
    /// Parse one already-trimmed line into a command.
    ///
    /// Tokens are split on single spaces, skipping empty runs, matching the
    /// whitespace-tolerant grammar of the original protocol rather than a
    /// strict single-space-separated one.
    pub fn parse(line: &str) -> Result<Command, ParseError> {
        let tokens: Vec<&str> = line.split(' ').filter(|t| !t.is_empty()).collect();

        match tokens.as_slice() {
            ["A", raw_id, name] => {
                let id = parse_host_id(raw_id).ok_or(ParseError)?;
                Ok(Command::Add { id, name: (*name).to_string() })
            }
            ["R", raw_id] => {
                let id = parse_host_id(raw_id).ok_or(ParseError)?;
                Ok(Command::Remove { id })
            }
            ["D", raw_id] => {
                let id = parse_host_id(raw_id).ok_or(ParseError)?;
                Ok(Command::MarkDefunct { id })
            }
            ["Q"] => Ok(Command::Disconnect),
            ["!SHUTDOWN!"] => Ok(Command::Shutdown),
            _ => Err(ParseError),
        }
    }
}

fn parse_host_id(raw: &str) -> Option<HostId> {
    let value: u64 = raw.parse().ok()?;
    HostId::new(value)
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
