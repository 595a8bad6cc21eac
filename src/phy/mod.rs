// Test frame codec, transmitter and BER analyzer

pub mod analyzer;
pub mod frame;
pub mod transmitter;

pub use analyzer::{BerAnalyzer, BerStatistics};
pub use frame::Frame;
pub use transmitter::{FrameTransmitter, TxStatistics};
