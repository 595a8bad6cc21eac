use std::io;
use std::thread;
use std::time::Duration;

use super::frame::Frame;
use crate::transport::Transport;
use crate::utils::CancellationToken;
use crate::utils::consts::TX_FRAME_PERIOD;
use tracing::{info, trace};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxStatistics {
    pub frames_sent: u64,
    /// Payload bits only, comparable with the receiver's compared bits
    pub bits_sent: u64,
}

/// Sends the same test frame over and over at a fixed period.
pub struct FrameTransmitter {
    frame_bytes: Vec<u8>,
    payload_bits: u64,
    period: Duration,
    stats: TxStatistics,
}

impl FrameTransmitter {
    pub fn new(frame: &Frame, period: Duration) -> Self {
        Self {
            frame_bytes: frame.to_bytes(),
            payload_bits: frame.payload_bits(),
            period,
            stats: TxStatistics::default(),
        }
    }

    pub fn frame_bytes(&self) -> &[u8] {
        &self.frame_bytes
    }

    pub fn stats(&self) -> TxStatistics {
        self.stats
    }

    /// Write one frame and count it.
    pub fn send_frame<T: Transport + ?Sized>(&mut self, transport: &mut T) -> io::Result<()> {
        transport.write_all(&self.frame_bytes)?;
        transport.flush()?;
        self.stats.frames_sent += 1;
        self.stats.bits_sent += self.payload_bits;
        trace!("[TX] frame {}", self.stats.frames_sent);
        Ok(())
    }

    /// Transmit until `cancel` fires. Cancellation is checked before every
    /// write, so a frame is either written whole or not at all.
    pub fn run<T, F>(
        &mut self,
        transport: &mut T,
        cancel: &CancellationToken,
        mut on_update: F,
    ) -> io::Result<TxStatistics>
    where
        T: Transport + ?Sized,
        F: FnMut(&TxStatistics),
    {
        info!("[TX] Starting transmission, the modem should be keying RF now");

        while !cancel.is_cancelled() {
            self.send_frame(transport)?;
            on_update(&self.stats);
            thread::sleep(self.period);
        }

        info!("[TX] Stopped after {} frames", self.stats.frames_sent);
        Ok(self.stats)
    }
}

impl Default for FrameTransmitter {
    fn default() -> Self {
        Self::new(&Frame::test_frame(), TX_FRAME_PERIOD)
    }
}
