// Byte transport between the host and the modem data port

pub mod mock;
pub mod serial;

pub use mock::MockTransport;
pub use serial::{SerialTransport, detect_port};

use std::io;

/// Duplex byte channel to the modem.
pub trait Transport {
    /// Write every byte of `bytes`.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// Append whatever is already buffered to `buf` without blocking.
    /// Returns the number of bytes appended.
    fn read_available(&mut self, buf: &mut Vec<u8>) -> io::Result<usize>;

    /// Discard pending input and output.
    fn clear_buffers(&mut self) -> io::Result<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(
        "permission denied on {port}. Run `sudo chmod 666 {port}` or add your user to the dialout group"
    )]
    PermissionDenied { port: String },

    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(#[source] serialport::Error),
}
