//! Sorted, paged execution over a query source.

use super::paging::PageWindow;
use super::sorting::{OrderingResolver, ResolvedOrderingPlan, SortableRecord};
use super::source::{OrderedQuerySource, apply_plan, run_cancellable};
use super::validation::PagingValidator;
use crate::config::DataFilterConfig;
use crate::error::Result;
use datafilter_model::{PaginatedItemsQuery, PaginatedResult, SortDirective};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Runs one page of a sorted query together with the unpaged total.
#[derive(Debug, Clone)]
pub struct PaginationExecutor<'r> {
    resolver: OrderingResolver<'r>,
    config: DataFilterConfig,
}

impl PaginationExecutor<'static> {
    /// Executor over the process-wide metadata registry.
    pub fn new(config: DataFilterConfig) -> Self {
        Self::with_resolver(OrderingResolver::global(), config)
    }
}

impl Default for PaginationExecutor<'static> {
    fn default() -> Self {
        Self::new(DataFilterConfig::default())
    }
}

impl<'r> PaginationExecutor<'r> {
    pub fn with_resolver(resolver: OrderingResolver<'r>, config: DataFilterConfig) -> Self {
        Self { resolver, config }
    }

    pub fn config(&self) -> &DataFilterConfig {
        &self.config
    }

    /// Apply `plan`, then fetch the requested page and the total count.
    ///
    /// Paging applies only when both `page` and `page_size` are present;
    /// otherwise every record is returned. A page past the end yields empty
    /// data with the true count.
    pub async fn paginate<S>(
        &self,
        source: S,
        plan: &ResolvedOrderingPlan,
        page: Option<u32>,
        page_size: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResult<S::Item>>
    where
        S: OrderedQuerySource,
    {
        let ordered = apply_plan(source, plan)?;
        let window = PageWindow::from_parts(page, page_size);
        let paged = window.map(|window| ordered.apply_skip_take(window.offset(), window.limit()));
        let view = paged.as_ref().unwrap_or(&ordered);

        let (data, count) = run_cancellable(cancel, async {
            if self.config.concurrent_count {
                tokio::try_join!(view.to_list(cancel), ordered.count(cancel))
            } else {
                let data = view.to_list(cancel).await?;
                let count = ordered.count(cancel).await?;
                Ok((data, count))
            }
        })
        .await?;

        debug!(
            target: "datafilter::paging",
            record = plan.record(),
            page = ?page,
            page_size = ?page_size,
            returned = data.len(),
            count,
            "paginated query executed"
        );

        Ok(PaginatedResult::new(page, page_size, count, data))
    }

    /// Resolve `directives` for the source's record type, then paginate.
    pub async fn paginate_sorted<S>(
        &self,
        source: S,
        directives: &[SortDirective],
        page: Option<u32>,
        page_size: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResult<S::Item>>
    where
        S: OrderedQuerySource,
        S::Item: SortableRecord,
    {
        let plan = self.resolver.resolve::<S::Item>(directives)?;
        self.paginate(source, &plan, page, page_size, cancel).await
    }

    /// Validate, resolve and paginate a complete request. Nothing touches
    /// the source until validation and resolution have succeeded.
    pub async fn execute<S, F>(
        &self,
        source: S,
        query: &PaginatedItemsQuery<F>,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResult<S::Item>>
    where
        S: OrderedQuerySource,
        S::Item: SortableRecord,
        F: Sync,
    {
        let window = PagingValidator::new(&self.config).validate_paginated(query)?;
        let (page, page_size) = match window {
            Some(window) => (Some(window.page), Some(window.page_size)),
            None => (None, None),
        };
        self.paginate_sorted(source, &query.sorting, page, page_size, cancel)
            .await
    }
}
