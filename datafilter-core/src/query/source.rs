//! The lazy query abstraction every storage adapter implements.

use super::sorting::{OrderStep, ResolvedOrderingPlan};
use crate::error::{DataFilterError, Result};
use async_trait::async_trait;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// A composable, not yet executed query over records of one type.
///
/// Sources are immutable values: every operation returns a new view and
/// leaves `self` untouched. Only [`to_list`](Self::to_list) and
/// [`count`](Self::count) perform I/O.
#[async_trait]
pub trait OrderedQuerySource: Sized + Send + Sync {
    type Item: Send;

    /// Add one ordering step. The first call sets the primary order, later
    /// calls only break ties. Adapters that cannot order by `step.path` fail
    /// with [`DataFilterError::UnsupportedSortPath`].
    fn apply_order_step(&self, step: &OrderStep) -> Result<Self>;

    /// Restrict the view to `limit` records starting at `offset`.
    fn apply_skip_take(&self, offset: usize, limit: usize) -> Self;

    /// Materialize the current view.
    async fn to_list(&self, cancel: &CancellationToken) -> Result<Vec<Self::Item>>;

    /// Number of records in the view, ignoring any skip/take window.
    async fn count(&self, cancel: &CancellationToken) -> Result<u64>;
}

/// Apply every step of `plan` in order.
pub fn apply_plan<S: OrderedQuerySource>(source: S, plan: &ResolvedOrderingPlan) -> Result<S> {
    plan.steps()
        .iter()
        .try_fold(source, |ordered, step| ordered.apply_order_step(step))
}

/// Run `fut` unless `cancel` fires first.
pub(crate) async fn run_cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if cancel.is_cancelled() {
        return Err(DataFilterError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DataFilterError::Cancelled),
        result = fut => result,
    }
}
