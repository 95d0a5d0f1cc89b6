//! Logger module
//!
//! Console logging for the dev server: startup banner, one `[Server]` line
//! per handled request, stop message, and error/warning output on stderr.
//! Logging is observational only; nothing here can fail request delivery.

use crate::config::ServerConfig;
use hyper::{Method, StatusCode, Uri, Version};

/// Startup banner: port, serving directory, URL to open, stop hint.
pub fn log_server_start(config: &ServerConfig) {
    println!("Starting VidShrink server on port {}", config.port);
    println!("Serving files from: {}", config.root.display());
    println!("Open your browser to: http://localhost:{}", config.port);
    println!("Press Ctrl+C to stop the server");
    println!();
}

/// One line per handled request: `[Server] "<method> <path> <version>" <status> -`
pub fn log_request(method: &Method, uri: &Uri, version: Version, status: StatusCode) {
    println!(
        "[Server] \"{} {} {:?}\" {} -",
        method,
        uri.path(),
        version,
        status.as_u16()
    );
}

/// Stop message printed on interrupt, before the process exits 0.
pub fn log_server_stop() {
    println!("\nServer stopped.");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}
