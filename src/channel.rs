use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::error::ChannelError;

/// A duplex channel carrying one text frame per message.
pub trait Channel {
    /// Blocks for the next frame. `ChannelError::Closed` once the peer is gone.
    fn recv(&mut self) -> Result<String, ChannelError>;
    fn send(&mut self, frame: &str) -> Result<(), ChannelError>;
}

/// Newline-delimited frames over a reader/writer pair.
pub struct LineChannel<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineChannel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> Channel for LineChannel<R, W> {
    fn recv(&mut self) -> Result<String, ChannelError> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(ChannelError::Closed);
            }
            let frame = line.trim();
            if !frame.is_empty() {
                return Ok(frame.to_string());
            }
        }
    }

    fn send(&mut self, frame: &str) -> Result<(), ChannelError> {
        writeln!(self.writer, "{frame}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Scripted inbox and recorded outbox.
#[derive(Debug, Default, Clone)]
pub struct MemoryChannel {
    inbox: VecDeque<String>,
    outbox: Vec<String>,
}

impl MemoryChannel {
    pub fn new<I, S>(frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inbox: frames.into_iter().map(Into::into).collect(),
            outbox: Vec::new(),
        }
    }

    pub fn push(&mut self, frame: impl Into<String>) {
        self.inbox.push_back(frame.into());
    }

    pub fn sent(&self) -> &[String] {
        &self.outbox
    }

    pub fn take_sent(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outbox)
    }

    pub fn pending(&self) -> usize {
        self.inbox.len()
    }
}

impl Channel for MemoryChannel {
    fn recv(&mut self) -> Result<String, ChannelError> {
        self.inbox.pop_front().ok_or(ChannelError::Closed)
    }

    fn send(&mut self, frame: &str) -> Result<(), ChannelError> {
        self.outbox.push(frame.to_string());
        Ok(())
    }
}
