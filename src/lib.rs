//! Raveon RV-M21 modem pair configuration and RF link bit error rate testing.
//!
//! One process plays one end of the link: it optionally pushes a frequency
//! plan to its modem over AT command mode, then either transmits fixed test
//! frames or counts bit errors in the frames it receives.

pub mod error;
pub mod modem;
pub mod phy;
pub mod session;
pub mod transport;
pub mod ui;
pub mod utils;
