// Modem configuration over AT command mode

pub mod command;
pub mod config;

pub use command::{CommandModeController, CommandState, CommandTiming, ConfigurationReport};
pub use config::{AtCommand, ModemConfig, ModemRole};
