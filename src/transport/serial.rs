use std::io::{self, Read, Write};

use serialport::{ClearBuffer, FlowControl, SerialPort, SerialPortType};
use tracing::{debug, info};

use super::{Transport, TransportError};
use crate::utils::consts::{ADAPTER_KEYWORDS, READ_TIMEOUT};

/// Modem data port opened with RTS/CTS flow control.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, TransportError> {
        let port = serialport::new(path, baud_rate)
            .timeout(READ_TIMEOUT)
            .flow_control(FlowControl::Hardware)
            .open()
            .map_err(|e| open_error(path, e))?;

        info!("Opened {} at {} bps (RTS/CTS)", path, baud_rate);
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }

    fn read_available(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        let available = self.port.bytes_to_read()? as usize;
        if available == 0 {
            return Ok(0);
        }

        let start = buf.len();
        buf.resize(start + available, 0);
        match self.port.read(&mut buf[start..]) {
            Ok(n) => {
                buf.truncate(start + n);
                Ok(n)
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                buf.truncate(start);
                Ok(0)
            }
            Err(e) => {
                buf.truncate(start);
                Err(e)
            }
        }
    }

    fn clear_buffers(&mut self) -> io::Result<()> {
        self.port.clear(ClearBuffer::All)?;
        Ok(())
    }
}

fn open_error(port: &str, source: serialport::Error) -> TransportError {
    let denied = matches!(
        source.kind,
        serialport::ErrorKind::Io(io::ErrorKind::PermissionDenied)
    ) || source.description.contains("Permission denied");

    if denied {
        TransportError::PermissionDenied {
            port: port.to_string(),
        }
    } else {
        TransportError::Open {
            port: port.to_string(),
            source,
        }
    }
}

fn is_modem_adapter(description: &str) -> bool {
    let upper = description.to_uppercase();
    ADAPTER_KEYWORDS
        .iter()
        .any(|keyword| upper.contains(keyword))
}

/// Find the first USB serial adapter that looks like a modem cable.
pub fn detect_port() -> Result<Option<String>, TransportError> {
    let ports = serialport::available_ports().map_err(TransportError::Enumerate)?;
    info!("--- Searching for modems ---");

    let mut candidates = Vec::new();
    for port in ports {
        let description = match &port.port_type {
            SerialPortType::UsbPort(usb) => format!(
                "{} {}",
                usb.manufacturer.as_deref().unwrap_or_default(),
                usb.product.as_deref().unwrap_or_default()
            ),
            _ => String::new(),
        };
        debug!("{}: {:?}", port.port_name, port.port_type);

        if is_modem_adapter(&description) {
            info!(" -> Found: {} ({})", port.port_name, description.trim());
            candidates.push(port.port_name);
        }
    }

    Ok(candidates.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_keywords() {
        assert!(is_modem_adapter("FTDI FT231X USB UART"));
        assert!(is_modem_adapter("ftdi"));
        assert!(is_modem_adapter("Future Technology USB UART"));
        assert!(!is_modem_adapter("Prolific PL2303"));
        assert!(!is_modem_adapter(""));
    }

    #[test]
    fn test_permission_error_gets_hint() {
        let source = serialport::Error::new(
            serialport::ErrorKind::Io(io::ErrorKind::PermissionDenied),
            "Permission denied",
        );
        let err = open_error("/dev/ttyUSB0", source);
        assert!(matches!(err, TransportError::PermissionDenied { .. }));
        assert!(err.to_string().contains("sudo chmod 666 /dev/ttyUSB0"));
    }

    #[test]
    fn test_busy_device_is_plain_open_error() {
        let source = serialport::Error::new(serialport::ErrorKind::NoDevice, "Device or resource busy");
        let err = open_error("/dev/ttyUSB1", source);
        assert!(matches!(err, TransportError::Open { .. }));
    }

    #[test]
    fn test_open_missing_device_uses_given_path() {
        let path = "/dev/raveon-ber-missing";
        let err = match SerialTransport::open(path, 19200) {
            Ok(_) => panic!("opened a device that does not exist"),
            Err(e) => e,
        };
        assert!(matches!(err, TransportError::Open { ref port, .. } if port == path));
    }
}
