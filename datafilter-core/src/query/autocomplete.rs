//! Search-as-you-type execution with over-fetch detection.

use super::paging::PageWindow;
use super::sorting::{
    FieldValues, OrderingResolver, SortFieldsBuilder, SortValue, SortableRecord,
};
use super::source::{OrderedQuerySource, apply_plan, run_cancellable};
use super::validation::PagingValidator;
use crate::config::DataFilterConfig;
use crate::error::Result;
use async_trait::async_trait;
use datafilter_model::{AutoCompleteQuery, AutoCompleteResult, NamedItem, SortDirection};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Fetches one page of suggestions and reports whether more exist, without
/// counting the full result.
#[derive(Debug, Clone)]
pub struct AutoCompleteExecutor<'r> {
    resolver: OrderingResolver<'r>,
    config: DataFilterConfig,
}

impl AutoCompleteExecutor<'static> {
    pub fn new(config: DataFilterConfig) -> Self {
        Self::with_resolver(OrderingResolver::global(), config)
    }
}

impl Default for AutoCompleteExecutor<'static> {
    fn default() -> Self {
        Self::new(DataFilterConfig::default())
    }
}

impl<'r> AutoCompleteExecutor<'r> {
    pub fn with_resolver(resolver: OrderingResolver<'r>, config: DataFilterConfig) -> Self {
        Self { resolver, config }
    }

    pub fn config(&self) -> &DataFilterConfig {
        &self.config
    }

    /// With `order_by_primary_key` the record's default ordering chain is
    /// applied first. When paged, one extra record is fetched: receiving it
    /// sets `has_more` and it is dropped from the returned data.
    pub async fn autocomplete<S>(
        &self,
        source: S,
        order_by_primary_key: bool,
        page: Option<u32>,
        page_size: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<AutoCompleteResult<S::Item>>
    where
        S: OrderedQuerySource,
        S::Item: SortableRecord,
    {
        let source = if order_by_primary_key {
            let plan = self.resolver.default_plan::<S::Item>()?;
            apply_plan(source, &plan)?
        } else {
            source
        };

        let window = PageWindow::from_parts(page, page_size);
        let view = match window {
            Some(window) => source.apply_skip_take(window.offset(), window.over_fetch_limit()),
            None => source,
        };

        let mut data = run_cancellable(cancel, view.to_list(cancel)).await?;
        let has_more = match window {
            Some(window) if data.len() > window.limit() => {
                data.truncate(window.limit());
                true
            }
            _ => false,
        };

        debug!(
            target: "datafilter::autocomplete",
            record = <S::Item as SortableRecord>::record_name(),
            ordered = order_by_primary_key,
            page = ?page,
            page_size = ?page_size,
            returned = data.len(),
            has_more,
            "autocomplete query executed"
        );

        Ok(AutoCompleteResult::new(data, has_more))
    }

    /// Validate the request, then run [`autocomplete`](Self::autocomplete).
    pub async fn execute<S, F>(
        &self,
        source: S,
        query: &AutoCompleteQuery<F>,
        order_by_primary_key: bool,
        cancel: &CancellationToken,
    ) -> Result<AutoCompleteResult<S::Item>>
    where
        S: OrderedQuerySource,
        S::Item: SortableRecord,
        F: Sync,
    {
        let window = PagingValidator::new(&self.config).validate_autocomplete(query)?;
        let (page, page_size) = match window {
            Some(window) => (Some(window.page), Some(window.page_size)),
            None => (None, None),
        };
        self.autocomplete(source, order_by_primary_key, page, page_size, cancel)
            .await
    }
}

/// An autocomplete endpoint: builds a filtered source from the request
/// filter and runs it through an [`AutoCompleteExecutor`].
#[async_trait]
pub trait AutoCompleteQueryHandler: Send + Sync {
    type Filter: Send + Sync;
    type Item: SortableRecord + Send;
    type Source: OrderedQuerySource<Item = Self::Item>;

    /// Apply the item's default ordering before paging.
    fn order_by_name(&self) -> bool {
        true
    }

    /// The filtered, not yet executed query for `filter`.
    fn source(&self, filter: &Self::Filter) -> Self::Source;

    fn executor(&self) -> AutoCompleteExecutor<'static> {
        AutoCompleteExecutor::default()
    }

    async fn handle(
        &self,
        query: &AutoCompleteQuery<Self::Filter>,
        cancel: &CancellationToken,
    ) -> Result<AutoCompleteResult<Self::Item>> {
        let source = self.source(&query.filter);
        self.executor()
            .execute(source, query, self.order_by_name(), cancel)
            .await
    }
}

impl<K> SortableRecord for NamedItem<K>
where
    K: Send + Sync + 'static,
{
    fn record_name() -> &'static str {
        "NamedItem"
    }

    fn describe(fields: &mut SortFieldsBuilder) {
        fields
            .value("Id")
            .external_name("id")
            .mandatory(0, SortDirection::Ascending);
        fields
            .text("Name")
            .external_name("name")
            .default_order(0, SortDirection::Ascending);
    }
}

impl<K> FieldValues for NamedItem<K>
where
    K: Clone + Into<SortValue>,
{
    fn field_value(&self, path: &str) -> Option<SortValue> {
        match path {
            "Id" => Some(self.id.clone().into()),
            "Name" => Some(SortValue::from(self.name.as_str())),
            _ => None,
        }
    }
}
