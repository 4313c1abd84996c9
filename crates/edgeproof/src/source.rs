//! Raw-event sources.
//!
//! A source yields newline-delimited UTF-8 text lines from the sensor.
//! The primary implementation reads any async byte stream (the ingest
//! binary opens the configured device node); a scripted source backs the
//! tests.

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Errors reading from the raw-event source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error reading event source: {0}")]
    Io(#[from] std::io::Error),
}

/// A stream of raw event lines.
#[async_trait]
pub trait EventSource: Send {
    /// Next line from the source, trimmed; `None` at end of stream.
    async fn next_line(&mut self) -> Result<Option<String>, SourceError>;
}

/// Line reader over any buffered async byte stream.
pub struct LineSource<R> {
    reader: R,
}

impl<R: AsyncBufRead + Unpin + Send> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> EventSource for LineSource<R> {
    async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
        let mut buf = Vec::new();
        let n = self.reader.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        // A noisy serial line can emit garbage bytes mid-stream; replace
        // them rather than kill the loop.
        let line = String::from_utf8_lossy(&buf).trim().to_string();
        Ok(Some(line))
    }
}

/// Scripted source for tests.
pub struct VecSource {
    lines: std::vec::IntoIter<String>,
}

impl VecSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(Into::into)
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }
}

#[async_trait]
impl EventSource for VecSource {
    async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
        Ok(self.lines.next())
    }
}
