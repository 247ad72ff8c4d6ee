//! Printer connection settings.

use std::time::Duration;

/// Settings for a network printer connection.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Connect and write timeouts.
    pub timeouts: PrinterTimeouts,
    /// TCP keepalive idle time; `None` leaves the OS default.
    pub keepalive: Option<Duration>,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            timeouts: PrinterTimeouts::default(),
            keepalive: Some(Duration::from_secs(60)),
        }
    }
}

impl PrinterConfig {
    /// Defaults with both timeouts replaced.
    pub fn with_timeouts(connect: Duration, write: Duration) -> Self {
        Self {
            timeouts: PrinterTimeouts { connect, write },
            ..Self::default()
        }
    }
}

/// Timeouts for a single print job.
///
/// Defaults suit LAN printers: 5 s to connect, 30 s to write (a label with
/// an embedded `^GF` logo graphic can be large).
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct PrinterTimeouts {
    /// Maximum time to establish the connection.
    pub connect: Duration,
    /// Maximum time for one write to complete.
    pub write: Duration,
}

impl Default for PrinterTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            write: Duration::from_secs(30),
        }
    }
}
