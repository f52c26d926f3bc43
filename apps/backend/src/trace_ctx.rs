//! Task-local trace id for the request being handled.
//!
//! `RequestTrace` opens the scope; error rendering and logging read it.
//! Outside of a request scope the trace id is `"unknown"`.

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

/// The current request's trace id, or `"unknown"` outside a request.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run `future` with `trace_id` visible to [`trace_id`].
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trace_id_outside_context() {
        assert_eq!(trace_id(), "unknown");
    }

    #[tokio::test]
    async fn test_trace_id_within_context() {
        let seen = with_trace_id("trace-abc".to_string(), async { trace_id() }).await;
        assert_eq!(seen, "trace-abc");
        assert_eq!(trace_id(), "unknown");
    }
}
