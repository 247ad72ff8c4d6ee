//! Output sinks for serial labels.
//!
//! A rendered label document goes to a [`Printer`]: either a network
//! printer's raw TCP port ([`TcpPrinter`], port 9100) or a file
//! ([`FilePrinter`]). The API is synchronous and never retries; a failed
//! send is reported to the caller as a [`PrintError`].
mod addr;
mod config;
mod error;
mod file;
#[cfg(feature = "tcp")]
mod tcp;

pub use addr::{DEFAULT_PORT, resolve_printer_addr};
pub use config::{PrinterConfig, PrinterTimeouts};
pub use error::PrintError;
pub use file::FilePrinter;
#[cfg(feature = "tcp")]
pub use tcp::TcpPrinter;

/// Somewhere a label document can be sent.
pub trait Printer: Send {
    /// Send raw bytes.
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError>;

    /// Send a text document (ZPL) as its UTF-8 bytes.
    fn send_document(&mut self, document: &str) -> Result<(), PrintError> {
        self.send_raw(document.as_bytes())
    }
}

impl<P: Printer + ?Sized> Printer for Box<P> {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        (**self).send_raw(data)
    }

    fn send_document(&mut self, document: &str) -> Result<(), PrintError> {
        (**self).send_document(document)
    }
}

/// Send `document` `copies` times, stopping at the first failure.
///
/// Returns how many copies were sent.
pub fn send_copies<P: Printer + ?Sized>(
    printer: &mut P,
    document: &str,
    copies: usize,
) -> Result<usize, PrintError> {
    for sent in 0..copies {
        printer.send_document(document).map_err(|e| {
            tracing::warn!(sent, copies, error = %e, "print job stopped");
            e
        })?;
    }
    Ok(copies)
}
