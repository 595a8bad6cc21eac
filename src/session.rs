// One test run: optional modem configuration, then TX or RX until cancelled

use std::fmt;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::Result;
use crate::modem::{CommandModeController, CommandTiming, ModemConfig, ModemRole};
use crate::phy::{BerAnalyzer, BerStatistics, Frame, FrameTransmitter, TxStatistics};
use crate::transport::Transport;
use crate::ui::progress::{StatusLine, templates};
use crate::ui::{format_rx_summary, format_tx_summary};
use crate::utils::CancellationToken;
use crate::utils::consts::{RX_POLL_INTERVAL, TX_FRAME_PERIOD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSelection {
    Configure(ModemRole),
    /// Keep whatever the modem is currently set to
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMode {
    Transmit,
    Receive,
}

#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub role: RoleSelection,
    pub mode: TestMode,
    pub timing: CommandTiming,
    pub tx_period: Duration,
    pub rx_poll: Duration,
    pub show_status: bool,
}

impl SessionPlan {
    pub fn new(role: RoleSelection, mode: TestMode) -> Self {
        Self {
            role,
            mode,
            timing: CommandTiming::default(),
            tx_period: TX_FRAME_PERIOD,
            rx_poll: RX_POLL_INTERVAL,
            show_status: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSummary {
    Transmit(TxStatistics),
    Receive(BerStatistics),
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionSummary::Transmit(stats) => f.write_str(&format_tx_summary(stats)),
            SessionSummary::Receive(stats) => f.write_str(&format_rx_summary(stats)),
        }
    }
}

/// Run `plan` on an open transport until `cancel` fires.
pub fn run_session<T: Transport + ?Sized>(
    transport: &mut T,
    plan: &SessionPlan,
    cancel: &CancellationToken,
) -> Result<SessionSummary> {
    match plan.role {
        RoleSelection::Configure(role) => {
            let config = ModemConfig::for_role(role);
            let report = CommandModeController::new(transport, config, plan.timing).run()?;
            if !report.all_acknowledged() {
                warn!("Modem did not acknowledge every command, settings may be stale");
            }
        }
        RoleSelection::Skip => info!("Skipping frequency configuration"),
    }

    let summary = match plan.mode {
        TestMode::Transmit => {
            let status = status_line(plan, templates::TRANSMIT);
            let mut transmitter = FrameTransmitter::new(&Frame::test_frame(), plan.tx_period);
            let stats = transmitter.run(transport, cancel, |stats| {
                status.set_message(format!(
                    "Frames: {} | Bits: {}",
                    stats.frames_sent, stats.bits_sent
                ))
            });
            status.finish();
            SessionSummary::Transmit(stats?)
        }
        TestMode::Receive => {
            let status = status_line(plan, templates::RECEIVE);
            let mut analyzer = BerAnalyzer::default();
            let stats = analyzer.run(transport, cancel, plan.rx_poll, |stats| {
                status.set_message(stats.to_string())
            });
            status.finish();
            SessionSummary::Receive(stats?)
        }
    };

    Ok(summary)
}

fn status_line(plan: &SessionPlan, template: &str) -> StatusLine {
    if plan.show_status {
        StatusLine::new(template, "waiting...")
    } else {
        StatusLine::hidden()
    }
}
