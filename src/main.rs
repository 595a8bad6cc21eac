use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use dialoguer::{Input, Select};
use tracing::{error, info, warn};

use raveon_ber::error::Result;
use raveon_ber::modem::ModemRole;
use raveon_ber::session::{RoleSelection, SessionPlan, SessionSummary, TestMode, run_session};
use raveon_ber::transport::{SerialTransport, detect_port};
use raveon_ber::ui::print_banner;
use raveon_ber::utils::CancellationToken;
use raveon_ber::utils::consts::BAUD_RATE;
use raveon_ber::utils::logging::init_logging;

#[derive(Parser)]
#[command(author, version, about = "Configure a Raveon modem pair and measure RF link BER", long_about = None)]
struct Cli {
    /// Serial device of the modem (auto-detected when omitted)
    #[arg(short, long)]
    port: Option<String>,

    /// Frequency plan to push before testing
    #[arg(short, long, value_enum)]
    role: Option<RoleArg>,

    /// Test direction
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    #[arg(short, long, default_value_t = BAUD_RATE)]
    baud: u32,

    /// Disable the live status line
    #[arg(long)]
    no_status: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    /// TX 433 MHz / RX 430 MHz
    A,
    /// TX 430 MHz / RX 433 MHz
    B,
    /// Keep the modem's current settings
    Skip,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Send test frames
    Tx,
    /// Count bit errors in received frames
    Rx,
}

fn main() -> ExitCode {
    init_logging();
    print_banner();

    let cli = Cli::parse();
    match run(cli) {
        Ok(summary) => {
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<SessionSummary> {
    let port = match cli.port {
        Some(port) => port,
        None => match detect_port()? {
            Some(port) => port,
            None => {
                warn!("No adapter detected automatically");
                Input::<String>::new()
                    .with_prompt("Serial port (e.g. /dev/ttyUSB0 or COM6)")
                    .interact_text()?
                    .trim()
                    .to_string()
            }
        },
    };
    info!("Using port: {}", port);

    let mut transport = SerialTransport::open(&port, cli.baud)?;

    let role = match cli.role {
        Some(RoleArg::A) => RoleSelection::Configure(ModemRole::A),
        Some(RoleArg::B) => RoleSelection::Configure(ModemRole::B),
        Some(RoleArg::Skip) => RoleSelection::Skip,
        None => prompt_role()?,
    };
    let mode = match cli.mode {
        Some(ModeArg::Tx) => TestMode::Transmit,
        Some(ModeArg::Rx) => TestMode::Receive,
        None => prompt_mode()?,
    };

    let cancel = CancellationToken::new();
    cancel.cancel_on_ctrlc()?;
    info!("Press Ctrl+C to stop the test");

    let mut plan = SessionPlan::new(role, mode);
    plan.show_status = !cli.no_status;
    run_session(&mut transport, &plan, &cancel)
}

fn prompt_role() -> Result<RoleSelection> {
    let items = [
        "A) TX 433 MHz / RX 430 MHz",
        "B) TX 430 MHz / RX 433 MHz",
        "X) Skip configuration (use current settings)",
    ];
    let choice = Select::new()
        .with_prompt("Which role does this modem play?")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(match choice {
        0 => RoleSelection::Configure(ModemRole::A),
        1 => RoleSelection::Configure(ModemRole::B),
        _ => RoleSelection::Skip,
    })
}

fn prompt_mode() -> Result<TestMode> {
    let items = ["1) Transmitter (sends frames)", "2) Receiver (computes BER)"];
    let choice = Select::new()
        .with_prompt("Test mode")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(if choice == 0 {
        TestMode::Transmit
    } else {
        TestMode::Receive
    })
}
