// Frame format: [Sync marker: AA 55 AA 55] [Payload: N bytes, byte i = i mod 256]

use crate::utils::consts::{PAYLOAD_SIZE, SYNC_MARKER};

/// Known payload shared by transmitter and analyzer: byte `i` is `i mod 256`.
pub fn expected_payload(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Number of differing bits between two equally sized byte slices.
pub fn hamming_distance(received: &[u8], expected: &[u8]) -> u64 {
    debug_assert_eq!(received.len(), expected.len());
    received
        .iter()
        .zip(expected)
        .map(|(rx, exp)| (rx ^ exp).count_ones() as u64)
        .sum()
}

/// Offset of the first occurrence of `marker` in `haystack`.
pub fn find_marker(haystack: &[u8], marker: &[u8]) -> Option<usize> {
    if marker.is_empty() || haystack.len() < marker.len() {
        return None;
    }
    haystack
        .windows(marker.len())
        .position(|window| window == marker)
}

/// BER test frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub sync_marker: Vec<u8>,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(sync_marker: &[u8], payload_size: usize) -> Self {
        Self {
            sync_marker: sync_marker.to_vec(),
            payload: expected_payload(payload_size),
        }
    }

    /// The standard frame: 4-byte marker and a 64-byte pattern.
    pub fn test_frame() -> Self {
        Self::new(&SYNC_MARKER, PAYLOAD_SIZE)
    }

    /// Serialize frame to wire bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len());
        bytes.extend_from_slice(&self.sync_marker);
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    pub fn len(&self) -> usize {
        self.sync_marker.len() + self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn payload_bits(&self) -> u64 {
        self.payload.len() as u64 * 8
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::test_frame()
    }
}
