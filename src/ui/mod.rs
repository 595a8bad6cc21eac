pub mod progress;

use crate::phy::{BerStatistics, TxStatistics};

pub fn print_banner() {
    eprintln!("=== Raveon RV-M21 configurator and BER tester ===");
}

pub fn format_rx_summary(stats: &BerStatistics) -> String {
    let ber = match stats.ber() {
        Some(ber) => format!("{:.8}", ber),
        None => "N/A".to_string(),
    };
    format!(
        "--- BER RESULT ---\nFrames:     {}\nTotal bits: {}\nError bits: {}\nFinal BER:  {}",
        stats.frames_counted, stats.total_bits_compared, stats.error_bits, ber
    )
}

pub fn format_tx_summary(stats: &TxStatistics) -> String {
    format!(
        "--- TX RESULT ---\nFrames sent: {}\nBits sent:   {}",
        stats.frames_sent, stats.bits_sent
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rx_summary() {
        let stats = BerStatistics {
            total_bits_compared: 1024,
            error_bits: 1,
            frames_counted: 2,
        };
        let summary = format_rx_summary(&stats);
        assert!(summary.contains("Frames:     2"));
        assert!(summary.contains("Final BER:  0.00097656"));
    }

    #[test]
    fn test_rx_summary_without_data() {
        let summary = format_rx_summary(&BerStatistics::default());
        assert!(summary.ends_with("Final BER:  N/A"));
    }
}
