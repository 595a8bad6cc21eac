use std::fmt;
use std::io;
use std::time::Duration;

use super::frame::{expected_payload, find_marker, hamming_distance};
use crate::transport::Transport;
use crate::utils::CancellationToken;
use crate::utils::consts::{PAYLOAD_SIZE, SYNC_MARKER};
use tracing::{debug, info, trace};

/// Running bit error counters of one analyzer session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BerStatistics {
    pub total_bits_compared: u64,
    pub error_bits: u64,
    pub frames_counted: u64,
}

impl BerStatistics {
    fn record(&mut self, bits: u64, errors: u64) {
        self.total_bits_compared += bits;
        self.error_bits += errors;
        self.frames_counted += 1;
    }

    /// `None` until at least one frame has been compared.
    pub fn ber(&self) -> Option<f64> {
        if self.total_bits_compared == 0 {
            None
        } else {
            Some(self.error_bits as f64 / self.total_bits_compared as f64)
        }
    }
}

impl fmt::Display for BerStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pkts: {} | Err: {} | BER: ", self.frames_counted, self.error_bits)?;
        match self.ber() {
            Some(ber) => write!(f, "{:.6}", ber),
            None => write!(f, "N/A"),
        }
    }
}

/// Streaming frame synchronizer and bit error counter.
///
/// Bytes are accumulated in `buffer`; `cursor` marks the first byte that has
/// not been consumed yet. Consumed bytes are compacted away once per pass.
pub struct BerAnalyzer {
    marker: Vec<u8>,
    expected: Vec<u8>,
    buffer: Vec<u8>,
    cursor: usize,
    stats: BerStatistics,
}

impl BerAnalyzer {
    /// # Panics
    /// If `marker` is empty.
    pub fn new(marker: &[u8], payload_size: usize) -> Self {
        assert!(!marker.is_empty(), "sync marker must not be empty");
        Self {
            marker: marker.to_vec(),
            expected: expected_payload(payload_size),
            buffer: Vec::with_capacity(4 * (marker.len() + payload_size)),
            cursor: 0,
            stats: BerStatistics::default(),
        }
    }

    fn frame_len(&self) -> usize {
        self.marker.len() + self.expected.len()
    }

    // entry point for processing incoming bytes
    /// Returns the number of frames counted during this pass.
    pub fn process(&mut self, bytes: &[u8]) -> usize {
        self.buffer.extend_from_slice(bytes);

        let frame_len = self.frame_len();
        let payload_size = self.expected.len();
        let mut counted = 0;

        while self.buffer.len() - self.cursor >= frame_len {
            match find_marker(&self.buffer[self.cursor..], &self.marker) {
                None => {
                    // Keep a possible marker prefix split across reads
                    let keep = self.marker.len() - 1;
                    trace!(
                        "No marker in {} bytes, keeping last {}",
                        self.buffer.len() - self.cursor,
                        keep
                    );
                    self.cursor = self.buffer.len() - keep;
                    break;
                }
                Some(offset) if offset > 0 => {
                    debug!("Resync: discarding {} bytes before marker", offset);
                    self.cursor += offset;
                }
                Some(_) => {
                    let start = self.cursor + self.marker.len();
                    let Some(payload) = self.buffer.get(start..start + payload_size) else {
                        break; // wait for the rest of the payload
                    };
                    let errors = hamming_distance(payload, &self.expected);
                    self.stats.record(payload_size as u64 * 8, errors);
                    self.cursor += frame_len;
                    counted += 1;

                    if errors > 0 {
                        debug!(
                            "Frame {}: {} bit errors",
                            self.stats.frames_counted, errors
                        );
                    }
                }
            }
        }

        self.compact();
        counted
    }

    fn compact(&mut self) {
        if self.cursor > 0 {
            self.buffer.drain(..self.cursor);
            self.cursor = 0;
        }
    }

    pub fn stats(&self) -> BerStatistics {
        self.stats
    }

    /// Bytes received but not consumed yet.
    pub fn pending(&self) -> &[u8] {
        &self.buffer[self.cursor..]
    }

    /// Poll `transport` until `cancel` fires, feeding every chunk through
    /// [`BerAnalyzer::process`]. `on_update` runs after each pass that
    /// counted at least one frame.
    pub fn run<T, F>(
        &mut self,
        transport: &mut T,
        cancel: &CancellationToken,
        poll_interval: Duration,
        mut on_update: F,
    ) -> io::Result<BerStatistics>
    where
        T: Transport + ?Sized,
        F: FnMut(&BerStatistics),
    {
        info!("[RX] Waiting for data...");
        let mut chunk = Vec::new();

        while !cancel.is_cancelled() {
            chunk.clear();
            let read = transport.read_available(&mut chunk)?;
            if read == 0 {
                std::thread::sleep(poll_interval);
                continue;
            }
            trace!("[RX] {} bytes", read);

            if self.process(&chunk) > 0 {
                on_update(&self.stats);
            }
        }

        info!("[RX] Stopped after {} frames", self.stats.frames_counted);
        Ok(self.stats)
    }
}

impl Default for BerAnalyzer {
    fn default() -> Self {
        Self::new(&SYNC_MARKER, PAYLOAD_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phy::frame::Frame;

    fn frame_bytes() -> Vec<u8> {
        Frame::test_frame().to_bytes()
    }

    #[test]
    fn test_clean_frames() {
        let mut analyzer = BerAnalyzer::default();
        let stream: Vec<u8> = (0..5).flat_map(|_| frame_bytes()).collect();

        assert_eq!(analyzer.process(&stream), 5);

        let stats = analyzer.stats();
        assert_eq!(stats.frames_counted, 5);
        assert_eq!(stats.error_bits, 0);
        assert_eq!(stats.total_bits_compared, 5 * 64 * 8);
        assert_eq!(stats.ber(), Some(0.0));
        assert!(analyzer.pending().is_empty());
    }

    #[test]
    fn test_no_data_has_no_ber() {
        let analyzer = BerAnalyzer::default();
        assert_eq!(analyzer.stats().ber(), None);
        assert_eq!(analyzer.stats().to_string(), "Pkts: 0 | Err: 0 | BER: N/A");
    }

    #[test]
    fn test_bit_flips_counted_at_any_position() {
        for position in [0usize, 1, 17, 40, 63] {
            let mut bytes = frame_bytes();
            // three flipped bits in one payload byte
            bytes[4 + position] ^= 0b1001_0001;

            let mut analyzer = BerAnalyzer::default();
            analyzer.process(&bytes);

            assert_eq!(analyzer.stats().frames_counted, 1);
            assert_eq!(analyzer.stats().error_bits, 3, "position {}", position);
        }
    }

    #[test]
    fn test_partial_payload_is_not_consumed() {
        let bytes = frame_bytes();
        let mut analyzer = BerAnalyzer::default();

        assert_eq!(analyzer.process(&bytes[..40]), 0);
        assert_eq!(analyzer.pending(), &bytes[..40]);

        assert_eq!(analyzer.process(&bytes[40..]), 1);
        assert!(analyzer.pending().is_empty());
    }

    #[test]
    fn test_garbage_before_marker_is_discarded() {
        let mut stream = vec![0x00, 0x13, 0x37, 0xAA, 0x55, 0xFF, 0x42];
        stream.extend(frame_bytes());

        let mut analyzer = BerAnalyzer::default();
        assert_eq!(analyzer.process(&stream), 1);
        assert_eq!(analyzer.stats().error_bits, 0);
        assert!(analyzer.pending().is_empty());
    }

    #[test]
    fn test_no_marker_keeps_tail() {
        let noise: Vec<u8> = (0..100u8).map(|b| b | 0x01).collect();
        let mut analyzer = BerAnalyzer::default();

        assert_eq!(analyzer.process(&noise), 0);
        assert_eq!(analyzer.pending(), &noise[97..]);
    }

    #[test]
    fn test_marker_split_across_reads() {
        let bytes = frame_bytes();
        let mut analyzer = BerAnalyzer::default();

        assert_eq!(analyzer.process(&bytes[..2]), 0);
        assert_eq!(analyzer.process(&bytes[2..]), 1);
        assert_eq!(analyzer.stats().error_bits, 0);
    }

    #[test]
    fn test_marker_split_after_trim() {
        // Enough noise to force a search; the marker starts in the last 3 bytes
        let mut first = vec![0x11; 70];
        first.extend_from_slice(&SYNC_MARKER[..3]);
        let mut second = vec![SYNC_MARKER[3]];
        second.extend(expected_payload(PAYLOAD_SIZE));

        let mut analyzer = BerAnalyzer::default();
        assert_eq!(analyzer.process(&first), 0);
        assert_eq!(analyzer.pending(), &SYNC_MARKER[..3]);
        assert_eq!(analyzer.process(&second), 1);
        assert_eq!(analyzer.stats().error_bits, 0);
    }

    #[test]
    fn test_custom_geometry_consumes_whole_frames() {
        for (marker, payload_size) in [(vec![0x7E], 1usize), (vec![0xC3, 0x3C], 10), (vec![0xF0; 6], 300)] {
            let frame = Frame::new(&marker, payload_size).to_bytes();
            let mut stream = frame.clone();
            stream.extend_from_slice(&frame);
            stream.extend_from_slice(&frame[..frame.len() - 1]);

            let mut analyzer = BerAnalyzer::new(&marker, payload_size);
            assert_eq!(analyzer.process(&stream), 2);
            assert_eq!(analyzer.pending().len(), frame.len() - 1);
            assert_eq!(
                analyzer.stats().total_bits_compared,
                2 * payload_size as u64 * 8
            );
        }
    }
}
