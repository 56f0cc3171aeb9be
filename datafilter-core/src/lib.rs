//! # Datafilter Core
//!
//! Declarative dynamic sorting, pagination and autocomplete over lazy query
//! sources.
//!
//! ## Overview
//!
//! Record types declare once which of their fields may be sorted, which
//! fields order results when the caller asks for nothing, and which fields
//! always break ties. Requests then name fields by string, and the engine:
//!
//! - **Resolves** caller directives against the declared metadata, rejecting
//!   unknown and forbidden fields before any I/O
//! - **Paginates** a query source, fetching one page and the unpaged total
//! - **Autocompletes** by over-fetching a single record to detect more results
//!
//! Storage is abstracted behind [`query::OrderedQuerySource`]; an in-process
//! adapter is provided as [`query::MemorySource`].
//!
//! ## Architecture
//!
//! - [`query::sorting`]: field metadata, the metadata registry and the
//!   ordering resolver
//! - [`query`]: query sources and the pagination/autocomplete executors
//! - [`config`]: paging limits and execution knobs
//! - [`error`]: the crate error type
//!
//! ## Examples
//!
//! ```no_run
//! use datafilter_core::query::{
//!     FieldValues, MemorySource, PaginationExecutor, SortFieldsBuilder, SortValue,
//!     SortableRecord,
//! };
//! use datafilter_model::{PaginatedItemsQuery, SortDirection, SortDirective};
//! use tokio_util::sync::CancellationToken;
//!
//! #[derive(Clone)]
//! struct Customer {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl SortableRecord for Customer {
//!     fn describe(fields: &mut SortFieldsBuilder) {
//!         fields.value("Id").mandatory(0, SortDirection::Ascending);
//!         fields.text("Name").default_order(0, SortDirection::Ascending);
//!     }
//! }
//!
//! impl FieldValues for Customer {
//!     fn field_value(&self, path: &str) -> Option<SortValue> {
//!         match path {
//!             "Id" => Some(self.id.into()),
//!             "Name" => Some(self.name.as_str().into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! async fn first_page(customers: Vec<Customer>) -> datafilter_core::Result<usize> {
//!     let query = PaginatedItemsQuery::<()>::new(
//!         Some(1),
//!         Some(20),
//!         vec![SortDirective::desc("name")],
//!         None,
//!     );
//!     let page = PaginationExecutor::default()
//!         .execute(MemorySource::new(customers), &query, &CancellationToken::new())
//!         .await?;
//!     Ok(page.data.len())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Paging limits and execution settings
pub mod config;

/// Error types
pub mod error;

/// Query sources, ordering resolution and the executors
pub mod query;

pub use config::DataFilterConfig;
pub use error::{DataFilterError, Result};
pub use query::{
    AutoCompleteExecutor, AutoCompleteQueryHandler, MemorySource, OrderedQuerySource,
    OrderingResolver, PaginationExecutor, PagingValidator, ResolvedOrderingPlan,
    SortMetadataRegistry, SortableRecord,
};
