use std::future::Future;

use crate::contract::ctx::OpCtx;
use crate::domain::error::DomainError;

/// Run a store-facing future under the caller's deadline and cancellation token.
///
/// The future is dropped as soon as either fires, which aborts the in-flight
/// store call.
pub(crate) async fn bounded<T, F>(ctx: &OpCtx, operation: &str, fut: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    if ctx.is_cancelled() {
        return Err(DomainError::cancelled(operation));
    }

    let token = ctx.cancellation_token();
    let raced = async {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(DomainError::cancelled(operation)),
            res = fut => res,
        }
    };

    match ctx.deadline() {
        Some(deadline) => tokio::time::timeout_at(deadline, raced)
            .await
            .unwrap_or_else(|_| Err(DomainError::timed_out(operation))),
        None => raced.await,
    }
}
