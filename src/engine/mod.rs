//! Client-side table engine: filter, sort and paginate a snapshot of records.
//!
//! The engine does no I/O. Records come in once (already fetched), and every
//! view is recomputed from the records plus the current [`ViewState`].

pub mod filter;
pub mod page;
pub mod record;
pub mod schema;
pub mod sort;
pub mod value;
pub mod view;

pub use filter::{apply_filters, FilterState, Predicate};
pub use page::{paginate, Page, PagePolicy, PageState, DEFAULT_ROWS_PER_PAGE, ROWS_PER_PAGE_OPTIONS};
pub use record::Record;
pub use schema::{FieldDef, FieldKind, Schema};
pub use sort::{apply_sort, SortDirection, SortState};
pub use value::Value;
pub use view::{derive, DerivedView, TableView, ViewState};
