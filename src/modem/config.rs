// Role-dependent modem settings and the AT commands that apply them

use std::fmt;

use crate::utils::consts::{BAUD_CODE_9600, FREQ_HIGH_MHZ, FREQ_LOW_MHZ, PACKET_MODE};

/// Which end of the link this modem is. The two roles swap TX/RX frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModemRole {
    /// TX 433 MHz / RX 430 MHz
    A,
    /// TX 430 MHz / RX 433 MHz
    B,
}

impl fmt::Display for ModemRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModemRole::A => write!(f, "A"),
            ModemRole::B => write!(f, "B"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModemConfig {
    role: ModemRole,
    tx_frequency: f64,
    rx_frequency: f64,
    baud_code: u8,
    packet_mode: u8,
    carrier_required: bool,
}

impl ModemConfig {
    pub fn for_role(role: ModemRole) -> Self {
        let (tx_frequency, rx_frequency) = match role {
            ModemRole::A => (FREQ_HIGH_MHZ, FREQ_LOW_MHZ),
            ModemRole::B => (FREQ_LOW_MHZ, FREQ_HIGH_MHZ),
        };

        Self {
            role,
            tx_frequency,
            rx_frequency,
            baud_code: BAUD_CODE_9600,
            packet_mode: PACKET_MODE,
            carrier_required: false,
        }
    }

    pub fn role(&self) -> ModemRole {
        self.role
    }

    /// Transmit frequency in MHz
    pub fn tx_frequency(&self) -> f64 {
        self.tx_frequency
    }

    /// Receive frequency in MHz
    pub fn rx_frequency(&self) -> f64 {
        self.rx_frequency
    }

    pub fn baud_code(&self) -> u8 {
        self.baud_code
    }

    pub fn packet_mode(&self) -> u8 {
        self.packet_mode
    }

    pub fn carrier_required(&self) -> bool {
        self.carrier_required
    }

    /// Settings commands in the order they are sent.
    pub fn commands(&self) -> [AtCommand; 5] {
        [
            AtCommand::SetTxFrequency(self.tx_frequency),
            AtCommand::SetRxFrequency(self.rx_frequency),
            AtCommand::SetOperatingMode(self.packet_mode),
            AtCommand::SetBaudCode(self.baud_code),
            AtCommand::SetCarrierRequired(self.carrier_required),
        ]
    }
}

impl fmt::Display for ModemConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TX={:.4} / RX={:.4}, packet mode {}, baud code {}",
            self.tx_frequency, self.rx_frequency, self.packet_mode, self.baud_code
        )
    }
}

/// Command-mode lines understood by the modem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AtCommand {
    /// No-op probe
    Attention,
    SetTxFrequency(f64),
    SetRxFrequency(f64),
    SetOperatingMode(u8),
    SetBaudCode(u8),
    SetCarrierRequired(bool),
    Exit,
}

impl fmt::Display for AtCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtCommand::Attention => write!(f, "AT"),
            AtCommand::SetTxFrequency(mhz) => write!(f, "ATFT {:.4}", mhz),
            AtCommand::SetRxFrequency(mhz) => write!(f, "ATFR {:.4}", mhz),
            AtCommand::SetOperatingMode(mode) => write!(f, "ATMT {}", mode),
            AtCommand::SetBaudCode(code) => write!(f, "ATBD {}", code),
            AtCommand::SetCarrierRequired(required) => write!(f, "ATRF {}", u8::from(*required)),
            AtCommand::Exit => write!(f, "EXIT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(config: &ModemConfig) -> Vec<String> {
        config
            .commands()
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn test_role_a_commands() {
        let config = ModemConfig::for_role(ModemRole::A);
        assert_eq!(
            lines(&config),
            ["ATFT 433.0000", "ATFR 430.0000", "ATMT 0", "ATBD 3", "ATRF 0"]
        );
    }

    #[test]
    fn test_role_b_commands() {
        let config = ModemConfig::for_role(ModemRole::B);
        assert_eq!(
            lines(&config),
            ["ATFT 430.0000", "ATFR 433.0000", "ATMT 0", "ATBD 3", "ATRF 0"]
        );
    }

    #[test]
    fn test_roles_swap_frequencies() {
        let a = ModemConfig::for_role(ModemRole::A);
        let b = ModemConfig::for_role(ModemRole::B);

        assert_ne!(a.tx_frequency(), a.rx_frequency());
        assert_eq!(a.tx_frequency(), b.rx_frequency());
        assert_eq!(a.rx_frequency(), b.tx_frequency());
        assert_eq!(a.baud_code(), b.baud_code());
        assert_eq!(a.packet_mode(), b.packet_mode());
        assert!(!a.carrier_required() && !b.carrier_required());
    }

    #[test]
    fn test_control_lines() {
        assert_eq!(AtCommand::Attention.to_string(), "AT");
        assert_eq!(AtCommand::Exit.to_string(), "EXIT");
        assert_eq!(AtCommand::SetCarrierRequired(true).to_string(), "ATRF 1");
    }
}
