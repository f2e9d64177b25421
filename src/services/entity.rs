//! Generic entity service
//!
//! Maps one REST resource to typed list/get/create/update/delete calls.

use std::marker::PhantomData;

use crate::api::{ApiClient, ListQuery, Page};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Resource;

/// Service for one entity resource
pub struct EntityService<'a, R: Resource> {
    client: &'a ApiClient,
    _resource: PhantomData<R>,
}

impl<'a, R: Resource> EntityService<'a, R> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &'a ApiClient {
        self.client
    }

    pub fn list(&self, query: &ListQuery) -> LedgerResult<Page<R>> {
        self.client.list::<R>(query)
    }

    pub fn get(&self, id: R::Id) -> LedgerResult<R> {
        self.client.get::<R>(id)
    }

    pub fn create(&self, input: &R::Input) -> LedgerResult<R> {
        self.client.create::<R>(input)
    }

    pub fn update(&self, id: R::Id, input: &R::Input) -> LedgerResult<R> {
        self.client.update::<R>(id, input)
    }

    /// Delete; soft-deleted resources come back deactivated
    pub fn delete(&self, id: R::Id) -> LedgerResult<Option<R>> {
        self.client.delete::<R>(id)
    }

    /// Resolve a UUID or a business key (code, period label) to an entity
    pub fn find(&self, identifier: &str) -> LedgerResult<R> {
        self.find_in(identifier, ListQuery::default())
    }

    /// Like `find`, restricted by the facets of `scope`
    pub fn find_in(&self, identifier: &str, scope: ListQuery) -> LedgerResult<R> {
        let identifier = identifier.trim();
        if let Ok(id) = identifier.parse::<R::Id>() {
            return self.get(id);
        }

        let query = ListQuery {
            page: 1,
            limit: crate::api::query::MAX_LIMIT,
            search: Some(identifier.to_string()),
            facets: scope.facets,
        };
        let mut matches: Vec<R> = self
            .list(&query)?
            .data
            .into_iter()
            .filter(|item| item.lookup_key().eq_ignore_ascii_case(identifier))
            .collect();

        match matches.len() {
            0 => Err(LedgerError::NotFound {
                entity_type: R::LABEL,
                identifier: identifier.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            n => Err(LedgerError::validation(format!(
                "{} {} is ambiguous ({} matches); use the id",
                R::LABEL,
                identifier,
                n
            ))),
        }
    }
}
