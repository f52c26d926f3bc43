//! Unique test data so tests sharing a database never collide.

use ulid::Ulid;

/// A unique subject id in the form `{prefix}-{ulid}`.
///
/// ```
/// use portal_test_support::unique_sid;
///
/// let a = unique_sid("member");
/// let b = unique_sid("member");
/// assert_ne!(a, b);
/// assert!(a.starts_with("member-"));
/// ```
pub fn unique_sid(prefix: &str) -> String {
    format!("{prefix}-{}", Ulid::new())
}
