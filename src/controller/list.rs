//! Filtered, paginated list controller
//!
//! Owns the committed filters (page, limit, search, facets), the raw search
//! box with its debouncer, and the last page the server answered. Loads are
//! split into `begin_load` and `complete` so the caller decides how the
//! request runs; each load carries a sequence number and only the latest one
//! may update the state.

use std::time::{Duration, Instant};

use super::debounce::Debouncer;
use crate::api::query::MAX_LIMIT;
use crate::api::{ListQuery, Page, Pagination};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Resource;
use crate::services::EntityService;

/// Which loading indicator the view should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spinner {
    /// Nothing loaded yet
    FullPage,
    /// Reloading over existing rows
    Inline,
    None,
}

/// An issued list request
#[derive(Debug, Clone)]
pub struct LoadTicket {
    seq: u64,
    pub query: ListQuery,
}

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

pub struct ListController<R: Resource> {
    filters: ListQuery,
    search_input: String,
    debouncer: Debouncer<String>,
    items: Vec<R>,
    pagination: Pagination,
    loaded_once: bool,
    issued: u64,
    in_flight: Option<u64>,
    dirty: bool,
    error: Option<LedgerError>,
}

impl<R: Resource> ListController<R> {
    pub fn new(limit: u32, debounce: Duration) -> Self {
        let filters = ListQuery {
            limit: limit.clamp(1, MAX_LIMIT),
            ..ListQuery::default()
        };
        Self {
            pagination: Pagination::new(1, filters.limit, 0),
            filters,
            search_input: String::new(),
            debouncer: Debouncer::new(debounce),
            items: Vec::new(),
            loaded_once: false,
            issued: 0,
            in_flight: None,
            dirty: true,
            error: None,
        }
    }

    /// Start from a committed query (e.g. one built from command-line flags)
    pub fn with_query(mut self, query: ListQuery) -> Self {
        self.search_input = query.search.clone().unwrap_or_default();
        self.filters = ListQuery {
            page: query.page.max(1),
            limit: query.limit.clamp(1, MAX_LIMIT),
            ..query
        };
        self.dirty = true;
        self
    }

    pub fn filters(&self) -> &ListQuery {
        &self.filters
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Error banner from the last failed load
    pub fn error(&self) -> Option<&LedgerError> {
        self.error.as_ref()
    }

    /// Hand the last load failure to the caller, clearing the banner
    pub fn take_error(&mut self) -> Option<LedgerError> {
        self.error.take()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Raw keystrokes in the search box; committed after the debounce delay
    pub fn type_search(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.search_input = text.clone();
        self.debouncer.push(text, now);
    }

    /// Advance the debounce timer; true when a settled search was committed
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(text) => self.commit_search(&text),
            None => false,
        }
    }

    /// Commit whatever is typed without waiting for the delay
    pub fn flush_search(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(text) => self.commit_search(&text),
            None => false,
        }
    }

    fn commit_search(&mut self, text: &str) -> bool {
        let search = Some(text.trim().to_string()).filter(|s| !s.is_empty());
        if search == self.filters.search {
            return false;
        }
        log::debug!("search committed: {:?}", search);
        self.filters.search = search;
        self.filters.page = 1;
        self.dirty = true;
        true
    }

    pub fn set_page(&mut self, page: u32) {
        let mut page = page.max(1);
        if self.loaded_once && self.pagination.total_pages > 0 {
            page = page.min(self.pagination.total_pages);
        }
        if page != self.filters.page {
            self.filters.page = page;
            self.dirty = true;
        }
    }

    pub fn next_page(&mut self) {
        if self.pagination.has_next() {
            self.set_page(self.filters.page + 1);
        }
    }

    pub fn prev_page(&mut self) {
        if self.filters.page > 1 {
            self.set_page(self.filters.page - 1);
        }
    }

    pub fn set_limit(&mut self, limit: u32) {
        let limit = limit.clamp(1, MAX_LIMIT);
        if limit != self.filters.limit {
            self.filters.limit = limit;
            self.filters.page = 1;
            self.dirty = true;
        }
    }

    pub fn set_facet(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        if self.filters.facets.get(&key) != Some(&value) {
            self.filters.facets.insert(key, value);
            self.filters.page = 1;
            self.dirty = true;
        }
    }

    pub fn clear_facet(&mut self, key: &str) {
        if self.filters.facets.remove(key).is_some() {
            self.filters.page = 1;
            self.dirty = true;
        }
    }

    /// Ask for the current page again (after a mutation)
    pub fn reload(&mut self) {
        self.dirty = true;
    }

    /// Whether a committed change is waiting for a request
    pub fn needs_load(&self) -> bool {
        self.dirty
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn spinner(&self) -> Spinner {
        match (self.in_flight, self.loaded_once) {
            (None, _) => Spinner::None,
            (Some(_), false) => Spinner::FullPage,
            (Some(_), true) => Spinner::Inline,
        }
    }

    /// Issue a request for the committed filters
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.in_flight = Some(self.issued);
        self.dirty = false;
        LoadTicket {
            seq: self.issued,
            query: self.filters.clone(),
        }
    }

    /// Apply a response; false when the ticket is stale and was discarded
    pub fn complete(&mut self, ticket: LoadTicket, result: LedgerResult<Page<R>>) -> bool {
        if self.in_flight != Some(ticket.seq) {
            log::debug!(
                "discarding stale {} response #{} (latest #{})",
                R::PATH,
                ticket.seq,
                self.issued
            );
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                self.items = page.data;
                self.pagination = page.pagination;
                self.loaded_once = true;
                self.error = None;
                // The page emptied under us (e.g. last row deleted): step back
                let last = self.pagination.total_pages.max(1);
                if self.items.is_empty() && self.filters.page > last {
                    self.filters.page = last;
                    self.dirty = true;
                }
            }
            Err(e) => {
                log::warn!("Failed to load {}: {}", R::PATH, e);
                self.error = Some(e);
            }
        }
        true
    }

    /// Run one load synchronously through the service
    pub fn refresh(&mut self, service: &EntityService<R>) -> bool {
        let ticket = self.begin_load();
        let result = service.list(&ticket.query);
        self.complete(ticket, result)
    }

    /// Load only if a committed change is pending
    pub fn load_if_needed(&mut self, service: &EntityService<R>) -> bool {
        self.needs_load() && self.refresh(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EconomicGroup, EconomicGroupInput};
    use chrono::Utc;

    const DELAY: Duration = Duration::from_millis(400);

    fn group(code: &str) -> EconomicGroup {
        EconomicGroup::build(
            EconomicGroup::new_id(),
            EconomicGroupInput::new(code, code),
            Utc::now(),
        )
    }

    fn page(codes: &[&str], total: u64) -> LedgerResult<Page<EconomicGroup>> {
        Ok(Page {
            data: codes.iter().map(|c| group(c)).collect(),
            pagination: Pagination::new(1, 10, total),
        })
    }

    #[test]
    fn test_initial_then_inline_spinner() {
        let mut list = ListController::<EconomicGroup>::new(10, DELAY);
        assert!(list.needs_load());

        let ticket = list.begin_load();
        assert_eq!(list.spinner(), Spinner::FullPage);
        assert!(list.complete(ticket, page(&["A"], 1)));
        assert_eq!(list.spinner(), Spinner::None);

        list.reload();
        let _ticket = list.begin_load();
        assert_eq!(list.spinner(), Spinner::Inline);
    }

    #[test]
    fn test_one_request_per_settled_search() {
        let start = Instant::now();
        let mut list = ListController::<EconomicGroup>::new(10, DELAY);
        let ticket = list.begin_load();
        list.complete(ticket, page(&[], 0));

        let mut requests = 0;
        let mut drive = |list: &mut ListController<EconomicGroup>, ms: u64| {
            list.tick(start + Duration::from_millis(ms));
            if list.needs_load() {
                requests += 1;
                let ticket = list.begin_load();
                list.complete(ticket, page(&[], 0));
            }
        };

        list.type_search("a", start);
        drive(&mut list, 50);
        list.type_search("ac", start + Duration::from_millis(100));
        drive(&mut list, 150);
        list.type_search("acme", start + Duration::from_millis(200));
        drive(&mut list, 599);
        drive(&mut list, 600);
        drive(&mut list, 2000);

        assert_eq!(requests, 1);
        assert_eq!(list.filters().search.as_deref(), Some("acme"));
    }

    #[test]
    fn test_search_and_facet_reset_page() {
        let start = Instant::now();
        let mut list = ListController::<EconomicGroup>::new(10, DELAY);
        list.set_page(4);
        assert_eq!(list.filters().page, 4);

        list.type_search("x", start);
        assert!(list.tick(start + DELAY));
        assert_eq!(list.filters().page, 1);

        list.set_page(3);
        list.set_facet("isActive", true);
        assert_eq!(list.filters().page, 1);
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut list = ListController::<EconomicGroup>::new(10, DELAY);
        let slow = list.begin_load();
        list.set_facet("isActive", true);
        let fast = list.begin_load();

        assert!(list.complete(fast, page(&["NEW"], 1)));
        assert!(!list.complete(slow, page(&["OLD"], 1)));
        assert_eq!(list.items()[0].code, "NEW");
    }

    #[test]
    fn test_failure_sets_banner_and_keeps_rows() {
        let mut list = ListController::<EconomicGroup>::new(10, DELAY);
        let ticket = list.begin_load();
        list.complete(ticket, page(&["A"], 1));

        list.reload();
        let ticket = list.begin_load();
        list.complete(ticket, Err(LedgerError::Transport("connection refused".into())));

        assert!(list
            .error()
            .unwrap()
            .to_string()
            .contains("connection refused"));
        assert_eq!(list.items().len(), 1);
        assert!(!list.needs_load());

        list.dismiss_error();
        assert!(list.error().is_none());
    }

    #[test]
    fn test_failure_keeps_its_classification() {
        let mut list = ListController::<EconomicGroup>::new(10, DELAY);
        let ticket = list.begin_load();
        list.complete(ticket, Err(LedgerError::validation("page must be a number")));

        assert!(list.error().is_some_and(|e| e.is_validation()));
        let err = list.take_error().unwrap();
        assert!(err.is_validation());
        assert!(!err.is_transport());
        assert!(list.error().is_none());
    }

    #[test]
    fn test_limit_clamped() {
        let mut list = ListController::<EconomicGroup>::new(500, DELAY);
        assert_eq!(list.filters().limit, 100);
        list.set_limit(0);
        assert_eq!(list.filters().limit, 1);
    }
}
