//! Value objects shared across DataFilter crates.
//!
//! Everything here is plain data: sort directions and directives coming in,
//! paginated and autocomplete results going out. Enable the `serde` feature to
//! move them across a process boundary.
#![allow(missing_docs)]

pub mod autocomplete;
pub mod request;
pub mod results;
pub mod sorting;

pub use autocomplete::{AutoCompleteItem, NamedItem};
pub use request::{AutoCompleteQuery, HasPaging, PaginatedItemsQuery};
pub use results::{AutoCompleteResult, PaginatedResult};
pub use sorting::{SortDirection, SortDirective};
