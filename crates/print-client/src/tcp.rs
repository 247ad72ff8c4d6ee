//! Raw TCP transport (port 9100).

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tracing::{debug, info};

use crate::addr::resolve_printer_addr;
use crate::{PrintError, Printer, PrinterConfig};

/// A connection to a printer's raw port.
///
/// Bytes are written as-is; the printer interprets them as ZPL.
pub struct TcpPrinter {
    stream: TcpStream,
    addr: SocketAddr,
}

impl TcpPrinter {
    /// Connect to `addr` (`IP`, `IP:PORT`, `host`, `host:PORT`).
    ///
    /// The socket gets TCP_NODELAY, keepalive, and the write timeout from
    /// `config`.
    pub fn connect(addr: &str, config: PrinterConfig) -> Result<Self, PrintError> {
        let addr = resolve_printer_addr(addr)?;
        let timeout = config.timeouts.connect;
        let stream = TcpStream::connect_timeout(&addr, timeout).map_err(|source| {
            let addr = addr.to_string();
            match source.kind() {
                io::ErrorKind::ConnectionRefused => PrintError::ConnectionRefused { addr, source },
                io::ErrorKind::TimedOut => PrintError::ConnectionTimeout {
                    addr,
                    timeout,
                    source,
                },
                _ => PrintError::ConnectionFailed { addr, source },
            }
        })?;

        configure_stream(&stream, &config).map_err(|source| PrintError::ConnectionFailed {
            addr: addr.to_string(),
            source,
        })?;
        info!(%addr, "connected to printer");
        Ok(Self { stream, addr })
    }

    /// The resolved address of the printer.
    pub fn remote_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for TcpPrinter {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        self.stream.write_all(data).map_err(PrintError::WriteFailed)?;
        self.stream.flush().map_err(PrintError::WriteFailed)?;
        debug!(addr = %self.addr, bytes = data.len(), "sent to printer");
        Ok(())
    }
}

impl Drop for TcpPrinter {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

fn configure_stream(stream: &TcpStream, config: &PrinterConfig) -> io::Result<()> {
    stream.set_nodelay(true)?;
    if let Some(idle) = config.keepalive {
        configure_keepalive(stream, idle)?;
    }
    stream.set_write_timeout(Some(config.timeouts.write))?;
    Ok(())
}

fn configure_keepalive(stream: &TcpStream, idle: Duration) -> io::Result<()> {
    let keepalive = TcpKeepalive::new().with_time(idle);

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    let keepalive = keepalive.with_interval(idle);

    SockRef::from(stream).set_tcp_keepalive(&keepalive)
}
