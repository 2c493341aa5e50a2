use super::filter::{apply_filters, FilterState, Predicate};
use super::page::{paginate, total_pages, PagePolicy, PageState};
use super::record::{ensure_unique_ids, Record};
use super::schema::Schema;
use super::sort::{apply_sort, SortState};
use crate::error::Result;

/// Everything the user can change about a table: filters, sort, page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub filters: FilterState,
    pub sort: SortState,
    pub page: PageState,
}

/// The visible page of a table plus the pagination metadata to render it.
#[derive(Debug, PartialEq)]
pub struct DerivedView<'a> {
    pub records: Vec<&'a Record>,
    pub current_page: usize,
    pub rows_per_page: usize,
    /// Records left after filtering.
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Filter, sort and paginate `records` for `state`. Pure: the same inputs
/// always produce the same output and `records` is never modified.
pub fn derive<'a>(schema: &Schema, records: &'a [Record], state: &ViewState) -> DerivedView<'a> {
    let filtered = apply_filters(schema, records, &state.filters);
    let sorted = apply_sort(schema, filtered, &state.sort);
    let page = paginate(&sorted, &state.page);
    DerivedView {
        records: page.items.to_vec(),
        current_page: page.current_page,
        rows_per_page: page.rows_per_page,
        total: page.total,
        total_pages: page.total_pages,
        has_next: page.has_next,
        has_prev: page.has_prev,
    }
}

/// A record collection bound to its schema and the user's view state.
///
/// Mutators never fail: rejected input (unknown fields, out-of-range pages,
/// zero rows per page) leaves the state untouched and returns `false`.
#[derive(Debug, Clone)]
pub struct TableView {
    schema: Schema,
    records: Vec<Record>,
    state: ViewState,
    policy: PagePolicy,
}

impl TableView {
    pub fn new(schema: Schema, records: Vec<Record>) -> Result<Self> {
        ensure_unique_ids(&records)?;
        Ok(Self {
            schema,
            records,
            state: ViewState::default(),
            policy: PagePolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: PagePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_rows_per_page(mut self, rows: usize) -> Self {
        self.set_rows_per_page(rows);
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn filters(&self) -> &FilterState {
        &self.state.filters
    }

    pub fn sort(&self) -> &SortState {
        &self.state.sort
    }

    pub fn current_page(&self) -> usize {
        self.state.page.current_page()
    }

    pub fn rows_per_page(&self) -> usize {
        self.state.page.rows_per_page()
    }

    pub fn filtered_count(&self) -> usize {
        apply_filters(&self.schema, &self.records, &self.state.filters).len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_count(), self.rows_per_page())
    }

    /// Swap in a freshly fetched collection. Filters and sort are kept; the
    /// current page is clamped to the new result size.
    pub fn replace_records(&mut self, records: Vec<Record>) -> Result<()> {
        ensure_unique_ids(&records)?;
        self.records = records;
        self.reclamp();
        Ok(())
    }

    pub fn set_filter(&mut self, field: &str, predicate: Predicate) -> bool {
        if self.schema.index_of(field).is_none() {
            tracing::debug!(field, schema = self.schema.name(), "rejecting filter on unknown field");
            return false;
        }
        self.state.filters.set(field, predicate);
        self.after_filter_change();
        true
    }

    pub fn clear_filter(&mut self, field: &str) -> bool {
        if !self.state.filters.remove(field) {
            return false;
        }
        self.after_filter_change();
        true
    }

    pub fn set_global_filter(&mut self, text: &str) {
        self.state.filters.set_global(text);
        self.after_filter_change();
    }

    pub fn clear_filters(&mut self) {
        self.state.filters.clear();
        self.after_filter_change();
    }

    /// Sort by `field`. Selecting the current sort field again flips the
    /// direction; a new field starts ascending.
    pub fn set_sort(&mut self, field: &str) -> bool {
        if self.schema.index_of(field).is_none() {
            tracing::debug!(field, schema = self.schema.name(), "rejecting sort on unknown field");
            return false;
        }
        let sort = &mut self.state.sort;
        if sort.key == field {
            sort.direction = sort.direction.toggled();
        } else {
            *sort = SortState::by(field, Default::default());
        }
        if self.policy.reset_on_sort {
            self.state.page.set_current_page(1);
        }
        true
    }

    pub fn clear_sort(&mut self) {
        self.state.sort = SortState::default();
        if self.policy.reset_on_sort {
            self.state.page.set_current_page(1);
        }
    }

    pub fn set_rows_per_page(&mut self, rows: usize) -> bool {
        if rows < 1 {
            tracing::debug!("rejecting rows per page of 0");
            return false;
        }
        self.state.page.set_rows_per_page(rows);
        if self.policy.reset_on_rows_per_page {
            self.state.page.set_current_page(1);
        }
        self.reclamp();
        true
    }

    /// Jump to page `page`. Rejected if it is not in `[1, total_pages]`.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() {
            tracing::debug!(page, total = self.total_pages(), "rejecting out-of-range page");
            return false;
        }
        self.state.page.set_current_page(page);
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.current_page() + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        match self.current_page().checked_sub(1) {
            Some(page) => self.set_page(page),
            None => false,
        }
    }

    /// Unique display values of `field` across all records, in first-seen
    /// order. Nulls are skipped.
    pub fn distinct_values(&self, field: &str) -> Vec<String> {
        let Some(idx) = self.schema.index_of(field) else {
            return Vec::new();
        };
        let mut out: Vec<String> = Vec::new();
        for value in self.records.iter().filter_map(|r| r.value(idx)) {
            if value.is_null() {
                continue;
            }
            let text = value.to_string();
            if !out.contains(&text) {
                out.push(text);
            }
        }
        out
    }

    pub fn derive(&self) -> DerivedView<'_> {
        derive(&self.schema, &self.records, &self.state)
    }

    /// Every record that passes the filters, in sort order (all pages).
    pub fn sorted(&self) -> Vec<&Record> {
        let filtered = apply_filters(&self.schema, &self.records, &self.state.filters);
        apply_sort(&self.schema, filtered, &self.state.sort)
    }

    fn after_filter_change(&mut self) {
        if self.policy.reset_on_filter {
            self.state.page.set_current_page(1);
        }
        self.reclamp();
    }

    fn reclamp(&mut self) {
        let total = self.filtered_count();
        self.state.page.clamp(total);
    }
}
