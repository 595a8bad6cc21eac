use std::time::Duration;

/// Default log level, RUST_LOG takes precedence
pub const LOG_LEVEL: &str = "info";

// ============================================================================
// Serial link
// ============================================================================

/// Operating baud rate of the modem data port (bps)
pub const BAUD_RATE: u32 = 9600;

/// Idle read timeout of the serial port
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// USB-serial adapters shipped with the modems
pub const ADAPTER_KEYWORDS: [&str; 3] = ["FTDI", "USB UART", "FT231X"];

// ============================================================================
// Test frame
// ============================================================================

/// Sync marker prefixed to every test frame
pub const SYNC_MARKER: [u8; 4] = [0xAA, 0x55, 0xAA, 0x55];

/// Payload bytes per test frame
pub const PAYLOAD_SIZE: usize = 64;

/// Time between two transmitted frames
pub const TX_FRAME_PERIOD: Duration = Duration::from_millis(100);

/// Sleep between receive polls when the port is idle
pub const RX_POLL_INTERVAL: Duration = Duration::from_millis(10);

// ============================================================================
// Command mode (AT)
// ============================================================================

/// Escape sequence switching the modem into command mode
pub const ESCAPE_SEQUENCE: &[u8] = b"+++";

/// Acknowledgement token searched in the modem's replies
pub const ACK_TOKEN: &[u8] = b"OK";

/// Command line terminator
pub const LINE_TERMINATOR: u8 = b'\r';

/// Line silence required before and after the escape sequence
pub const GUARD_INTERVAL: Duration = Duration::from_millis(1100);

/// Maximum wait for an acknowledgement token
pub const ACK_TIMEOUT: Duration = Duration::from_secs(2);

/// Delay after every command line, the modem parser is line buffered
pub const LINE_DELAY: Duration = Duration::from_millis(100);

/// Settle time after the exit command
pub const EXIT_SETTLE: Duration = Duration::from_millis(500);

/// Poll period while waiting for an acknowledgement
pub const ACK_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Frequency pair of the link (MHz)
pub const FREQ_LOW_MHZ: f64 = 430.0;
pub const FREQ_HIGH_MHZ: f64 = 433.0;

/// ATMT value selecting packetized operation
pub const PACKET_MODE: u8 = 0;

/// ATBD value selecting 9600 bps
pub const BAUD_CODE_9600: u8 = 3;
