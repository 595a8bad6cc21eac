use std::io;
use std::thread;
use std::time::{Duration, Instant};

use super::config::{AtCommand, ModemConfig};
use crate::phy::frame::find_marker;
use crate::transport::Transport;
use crate::utils::consts::*;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Operational,         // Transparent data mode, line idle
    EnteringCommandMode, // Escape sequence sent
    VerifyingCommandMode,
    ApplyingSettings,
    ExitingCommandMode,
    Done,
}

/// Outcome of waiting for the acknowledgement token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandAck {
    pub acknowledged: bool,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub command: AtCommand,
    pub ack: CommandAck,
}

/// What the modem acknowledged during one configuration pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationReport {
    /// Reply to the probe sent right after the escape sequence
    pub probe: Option<CommandAck>,
    pub commands: Vec<CommandOutcome>,
}

impl ConfigurationReport {
    pub fn all_acknowledged(&self) -> bool {
        self.probe.is_some_and(|ack| ack.acknowledged)
            && self
                .commands
                .iter()
                .all(|outcome| outcome.ack.acknowledged)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CommandTiming {
    pub guard_interval: Duration,
    pub ack_timeout: Duration,
    pub line_delay: Duration,
    pub exit_settle: Duration,
    pub ack_poll: Duration,
}

impl Default for CommandTiming {
    fn default() -> Self {
        Self {
            guard_interval: GUARD_INTERVAL,
            ack_timeout: ACK_TIMEOUT,
            line_delay: LINE_DELAY,
            exit_settle: EXIT_SETTLE,
            ack_poll: ACK_POLL_INTERVAL,
        }
    }
}

/// Single-pass driver of the modem's AT command mode.
///
/// Missing acknowledgements are logged and never abort the pass: every
/// settings command is sent exactly once, in order, and the machine always
/// ends in [`CommandState::Done`].
pub struct CommandModeController<'a, T: Transport + ?Sized> {
    transport: &'a mut T,
    config: ModemConfig,
    timing: CommandTiming,
    state: CommandState,
    report: ConfigurationReport,
}

impl<'a, T: Transport + ?Sized> CommandModeController<'a, T> {
    pub fn new(transport: &'a mut T, config: ModemConfig, timing: CommandTiming) -> Self {
        Self {
            transport,
            config,
            timing,
            state: CommandState::Operational,
            report: ConfigurationReport::default(),
        }
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    /// Run the whole sequence and return what was acknowledged.
    pub fn run(mut self) -> io::Result<ConfigurationReport> {
        info!("--- Starting configuration (role {}) ---", self.config.role());
        while self.state != CommandState::Done {
            self.step()?;
        }
        info!("--- Configuration complete ---");
        Ok(self.report)
    }

    /// Perform the action leaving the current state and advance.
    pub fn step(&mut self) -> io::Result<CommandState> {
        let next = match self.state {
            CommandState::Operational => {
                self.enter_command_mode()?;
                CommandState::EnteringCommandMode
            }
            CommandState::EnteringCommandMode => {
                self.verify_command_mode()?;
                CommandState::VerifyingCommandMode
            }
            CommandState::VerifyingCommandMode => {
                self.apply_settings()?;
                CommandState::ApplyingSettings
            }
            CommandState::ApplyingSettings => {
                self.exit_command_mode()?;
                CommandState::ExitingCommandMode
            }
            CommandState::ExitingCommandMode => {
                self.transport.clear_buffers()?;
                debug!("Transport buffers cleared");
                CommandState::Done
            }
            CommandState::Done => CommandState::Done,
        };

        trace!("{:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(next)
    }

    fn enter_command_mode(&mut self) -> io::Result<()> {
        info!("[CFG] Entering command mode (+++)...");
        // The modem only honours +++ surrounded by silence
        thread::sleep(self.timing.guard_interval);
        self.transport.write_all(ESCAPE_SEQUENCE)?;
        self.transport.flush()?;
        thread::sleep(self.timing.guard_interval);
        Ok(())
    }

    fn verify_command_mode(&mut self) -> io::Result<()> {
        // The escape reply is unreliable, so probe with a plain AT
        self.send_line(AtCommand::Attention)?;
        let ack = self.wait_for_ack()?;
        if ack.acknowledged {
            info!("[CFG] Modem in command mode");
        } else {
            warn!("[CFG] No OK after escape sequence, continuing anyway");
        }
        self.report.probe = Some(ack);
        Ok(())
    }

    fn apply_settings(&mut self) -> io::Result<()> {
        info!("[CFG] Applying {}", self.config);

        for command in self.config.commands() {
            self.send_line(command)?;
            thread::sleep(self.timing.line_delay);

            let ack = self.wait_for_ack()?;
            if ack.acknowledged {
                info!("  -> {}: OK", command);
            } else {
                warn!("  -> {}: no response (may already be configured)", command);
            }
            self.report.commands.push(CommandOutcome { command, ack });
        }
        Ok(())
    }

    fn exit_command_mode(&mut self) -> io::Result<()> {
        info!("[CFG] Leaving command mode (EXIT)...");
        self.send_line(AtCommand::Exit)?;
        thread::sleep(self.timing.exit_settle);
        Ok(())
    }

    fn send_line(&mut self, command: AtCommand) -> io::Result<()> {
        let mut line = command.to_string().into_bytes();
        line.push(LINE_TERMINATOR);
        debug!("[CFG] >> {}", command);
        self.transport.write_all(&line)?;
        self.transport.flush()
    }

    /// Accumulate replies until the token shows up or the timeout expires.
    fn wait_for_ack(&mut self) -> io::Result<CommandAck> {
        let start = Instant::now();
        let mut response = Vec::new();

        while start.elapsed() < self.timing.ack_timeout {
            if self.transport.read_available(&mut response)? > 0 {
                trace!("[CFG] << {:?}", String::from_utf8_lossy(&response));
                if find_marker(&response, ACK_TOKEN).is_some() {
                    return Ok(CommandAck {
                        acknowledged: true,
                        elapsed: start.elapsed(),
                    });
                }
            }
            thread::sleep(self.timing.ack_poll);
        }

        Ok(CommandAck {
            acknowledged: false,
            elapsed: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modem::config::ModemRole;
    use crate::transport::MockTransport;

    fn fast_timing() -> CommandTiming {
        CommandTiming {
            guard_interval: Duration::ZERO,
            ack_timeout: Duration::from_millis(20),
            line_delay: Duration::ZERO,
            exit_settle: Duration::ZERO,
            ack_poll: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_silent_modem_still_completes() {
        let mut transport = MockTransport::silent();
        let config = ModemConfig::for_role(ModemRole::A);

        let report = CommandModeController::new(&mut transport, config, fast_timing())
            .run()
            .unwrap();

        assert!(!report.probe.unwrap().acknowledged);
        assert_eq!(report.commands.len(), 5);
        assert!(report.commands.iter().all(|o| !o.ack.acknowledged));
        assert!(!report.all_acknowledged());

        assert_eq!(
            transport.written_lines(),
            ["+++AT", "ATFT 433.0000", "ATFR 430.0000", "ATMT 0", "ATBD 3", "ATRF 0", "EXIT"]
        );
        assert_eq!(transport.clear_count(), 1);
    }

    #[test]
    fn test_acknowledging_modem() {
        let mut transport = MockTransport::acknowledging();
        let config = ModemConfig::for_role(ModemRole::B);

        let report = CommandModeController::new(&mut transport, config, fast_timing())
            .run()
            .unwrap();

        assert!(report.all_acknowledged());
        let sent: Vec<String> = report
            .commands
            .iter()
            .map(|o| o.command.to_string())
            .collect();
        assert_eq!(sent, ["ATFT 430.0000", "ATFR 433.0000", "ATMT 0", "ATBD 3", "ATRF 0"]);
    }

    #[test]
    fn test_states_visited_in_order() {
        let mut transport = MockTransport::silent();
        let config = ModemConfig::for_role(ModemRole::A);
        let mut controller = CommandModeController::new(&mut transport, config, fast_timing());

        assert_eq!(controller.state(), CommandState::Operational);
        let visited: Vec<CommandState> = (0..6).map(|_| controller.step().unwrap()).collect();
        assert_eq!(
            visited,
            [
                CommandState::EnteringCommandMode,
                CommandState::VerifyingCommandMode,
                CommandState::ApplyingSettings,
                CommandState::ExitingCommandMode,
                CommandState::Done,
                CommandState::Done,
            ]
        );
    }

    #[test]
    fn test_escape_sequence_is_bare() {
        let mut transport = MockTransport::silent();
        let config = ModemConfig::for_role(ModemRole::A);
        let mut controller = CommandModeController::new(&mut transport, config, fast_timing());
        controller.step().unwrap();
        drop(controller);

        assert_eq!(transport.written(), b"+++");
    }

    #[test]
    fn test_ack_anywhere_in_response() {
        let mut transport = MockTransport::silent();
        transport.push_inbound(b"\r\nO".to_vec());
        transport.push_inbound(b"K\r\n".to_vec());
        let config = ModemConfig::for_role(ModemRole::A);
        let mut controller = CommandModeController::new(&mut transport, config, fast_timing());

        let ack = controller.wait_for_ack().unwrap();
        assert!(ack.acknowledged);
    }
}
