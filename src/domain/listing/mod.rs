//! Paginated listing with read-through caching
//!
//! A listing request is resolved into a [`PagePlan`], answered from the cache
//! when possible, and otherwise computed with a single count-and-slice
//! aggregation whose result is written back with a TTL that depends on
//! whether the page was empty.

mod aggregation;
mod page;
mod pagination;
mod read_through;

pub use aggregation::{TOTAL_COUNT_FIELD, decode_page, page_pipeline};
pub use page::PageResult;
pub use pagination::{DEFAULT_PAGE, DEFAULT_RECORDS_PER_PAGE, PagePlan};
pub use read_through::{CacheLookup, ReadThroughCache, TtlPolicy};
