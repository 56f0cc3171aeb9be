pub mod autocomplete;
pub mod memory;
pub mod pagination;
pub mod paging;
pub mod sorting;
pub mod source;
pub mod validation;

pub use autocomplete::{AutoCompleteExecutor, AutoCompleteQueryHandler};
pub use memory::MemorySource;
pub use pagination::PaginationExecutor;
pub use paging::PageWindow;
pub use sorting::*;
pub use source::{OrderedQuerySource, apply_plan};
pub use validation::PagingValidator;
