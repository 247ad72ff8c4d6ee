//! Printer address parsing and resolution.
//!
//! A printer is named as `IP`, `IP:PORT`, `host`, or `host:PORT`
//! (IPv6 literals bare or as `[addr]:PORT`). The raw port defaults to 9100.

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

use tracing::debug;

use crate::PrintError;

/// Raw (JetDirect) printing port.
pub const DEFAULT_PORT: u16 = 9100;

/// Resolve a printer address to the first socket address it names.
pub fn resolve_printer_addr(input: &str) -> Result<SocketAddr, PrintError> {
    let input = input.trim();
    let not_found = || PrintError::NoAddressFound(input.to_string());

    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    let (host, port) = split_host_port(input).ok_or_else(not_found)?;
    let addr = (host, port)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(not_found)?;
    debug!(%input, %addr, "resolved printer address");
    Ok(addr)
}

/// Split `host[:port]`. `None` when the host is empty or the port is not a
/// number.
fn split_host_port(input: &str) -> Option<(&str, u16)> {
    let (host, port) = match input.rsplit_once(':') {
        Some((host, port)) => (host, port.parse().ok()?),
        None => (input, DEFAULT_PORT),
    };
    let valid = !host.is_empty() && !host.contains(char::is_whitespace);
    valid.then_some((host, port))
}
