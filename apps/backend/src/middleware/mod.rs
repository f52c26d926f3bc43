pub mod admin_gate;
pub mod rate_limit;
pub mod request_trace;
pub mod security_headers;
pub mod session_guard;
pub mod structured_logger;

pub use admin_gate::AdminGate;
pub use request_trace::{RequestTrace, TraceId};
pub use security_headers::SecurityHeaders;
pub use session_guard::SessionGuard;
pub use structured_logger::StructuredLogger;
