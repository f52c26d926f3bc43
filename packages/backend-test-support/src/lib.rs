//! Test support for the portal backend
//!
//! Shared helpers for unit and integration tests: one-shot logging setup,
//! a migrated in-memory database, Set-Cookie inspection and Problem Details
//! assertions. Nothing here depends on `portal` types.

pub mod cookies;
pub mod db;
pub mod logging;
pub mod problem_details;
pub mod unique;

pub use cookies::{find_set_cookie, SetCookie};
pub use db::migrated_memory_db;
pub use problem_details::assert_problem_details;
pub use unique::unique_sid;
