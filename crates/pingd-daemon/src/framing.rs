// SPDX-License-Identifier: MIT

//! Bounded LF-delimited line framing for controller connections.
//!
//! Tracks a capped accumulator directly, so memory use never grows past
//! [`MAX_LINE_LEN`] regardless of how long the physical line on the wire
//! turns out to be; bytes past the cap are discarded until the next LF.

use std::io;

use pingd_wire::MAX_LINE_LEN;
use tokio::io::{AsyncRead, AsyncReadExt};

/// One framed unit read off a connection.
pub enum Line {
    /// A line at or under the length cap, LF-stripped and trimmed.
    Ok(String),
    /// A line whose physical length exceeded the cap. `0` holds the first
    /// `MAX_LINE_LEN` bytes seen (for the `ERROR` response); everything
    /// after that, up to the next LF, was discarded silently.
    Overlong(String),
}

/// Reads LF-terminated lines off `R`, enforcing [`MAX_LINE_LEN`].
pub struct LineReader<R> {
    inner: R,
    captured: Vec<u8>,
    overlong: bool,
    read_buf: [u8; 256],
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, captured: Vec::new(), overlong: false, read_buf: [0u8; 256] }
    }

    /// Read the next line. Returns `Ok(None)` on clean EOF with no partial
    /// line pending.
    pub async fn next_line(&mut self) -> io::Result<Option<Line>> {
        loop {
            let n = self.inner.read(&mut self.read_buf).await?;
            if n == 0 {
                return Ok(None);
            }

            for &byte in &self.read_buf[..n] {
                if byte == b'\n' {
                    let text = String::from_utf8_lossy(&self.captured).trim().to_string();
                    let overlong = self.overlong;
                    self.captured.clear();
                    self.overlong = false;
                    return Ok(Some(if overlong { Line::Overlong(text) } else { Line::Ok(text) }));
                }

                if self.captured.len() < MAX_LINE_LEN {
                    self.captured.push(byte);
                } else {
                    self.overlong = true;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "framing_tests.rs"]
mod tests;
