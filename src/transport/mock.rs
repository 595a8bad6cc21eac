use std::collections::VecDeque;
use std::io;

use super::Transport;
use crate::utils::consts::{ESCAPE_SEQUENCE, LINE_TERMINATOR};

/// In-memory transport for running the controller and the TX/RX loops
/// without hardware.
#[derive(Debug, Default)]
pub struct MockTransport {
    written: Vec<u8>,
    inbound: VecDeque<Vec<u8>>,
    reply: Option<Vec<u8>>,
    clears: usize,
    flushes: usize,
}

impl MockTransport {
    /// A modem that never answers.
    pub fn silent() -> Self {
        Self::default()
    }

    /// A modem answering `OK\r\n` to the escape sequence and to every command line.
    pub fn acknowledging() -> Self {
        Self {
            reply: Some(b"OK\r\n".to_vec()),
            ..Self::default()
        }
    }

    /// Queue a chunk returned by a later `read_available`.
    pub fn push_inbound(&mut self, chunk: impl Into<Vec<u8>>) {
        self.inbound.push_back(chunk.into());
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Written bytes split on the line terminator, terminators dropped.
    pub fn written_lines(&self) -> Vec<String> {
        self.written
            .split(|&b| b == LINE_TERMINATOR)
            .filter(|line| !line.is_empty())
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Take everything written so far, e.g. to loop it back into a receiver.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written)
    }
}

impl Transport for MockTransport {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.written.extend_from_slice(bytes);

        if let Some(reply) = &self.reply {
            if bytes == ESCAPE_SEQUENCE || bytes.last() == Some(&LINE_TERMINATOR) {
                self.inbound.push_back(reply.clone());
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn read_available(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        match self.inbound.pop_front() {
            Some(chunk) => {
                buf.extend_from_slice(&chunk);
                Ok(chunk.len())
            }
            None => Ok(0),
        }
    }

    fn clear_buffers(&mut self) -> io::Result<()> {
        self.clears += 1;
        self.inbound.clear();
        Ok(())
    }
}
