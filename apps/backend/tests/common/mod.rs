#![allow(dead_code)]

// Logging is auto-installed for every integration test binary
#[ctor::ctor]
fn init_logging() {
    portal_test_support::logging::init();
}

/// Peer address every test request is made from unless a test says otherwise.
pub const PEER: &str = "1.2.3.4:40000";
pub const PEER_IP: &str = "1.2.3.4";
