//! Per-resource request handling for the local backend
//!
//! `ResourceHandler` is object-safe and speaks JSON so the server can route
//! to any resource; `CollectionHandler<R>` implements it over a `Collection<R>`.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Mutex;

use serde_json::{json, Value};

use super::params::ListParams;
use crate::api::envelope::{codes, ApiError, Pagination};
use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::error::LedgerError;
use crate::models::{ActionContext, Resource, RuleViolation};
use crate::storage::{Collection, Storage};

/// Who is calling, and where mutations are recorded
pub struct RequestContext<'a> {
    pub user_id: Option<String>,
    pub audit: &'a AuditLogger,
}

impl RequestContext<'_> {
    fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry.by_user(self.user_id.clone())) {
            log::warn!("Failed to write audit entry: {}", e);
        }
    }
}

/// Status code and JSON body of a successful answer
pub type Answer = (u16, Value);

pub trait ResourceHandler: Send + Sync {
    fn list(&self, params: &ListParams) -> Result<Answer, ApiError>;
    fn get(&self, id: &str) -> Result<Answer, ApiError>;
    fn create(&self, body: Value, ctx: &RequestContext) -> Result<Answer, ApiError>;
    fn update(&self, id: &str, body: Value, ctx: &RequestContext) -> Result<Answer, ApiError>;
    fn delete(&self, id: &str, ctx: &RequestContext) -> Result<Answer, ApiError>;
    fn action(&self, id: &str, action: &str, ctx: &RequestContext) -> Result<Answer, ApiError>;
}

pub struct CollectionHandler<R: Resource> {
    collection: Collection<R>,
    /// Serializes check-then-write sequences
    writes: Mutex<()>,
}

impl<R: Resource> CollectionHandler<R> {
    pub fn open(storage: &Storage) -> Result<Self, LedgerError> {
        Ok(Self {
            collection: storage.collection::<R>()?,
            writes: Mutex::new(()),
        })
    }

    fn find(&self, id: &str) -> Result<R, ApiError> {
        let not_found = || {
            ApiError::new(
                404,
                codes::NOT_FOUND,
                format!("{} {} not found", R::LABEL, id),
            )
        };
        let id = R::Id::from_str(id).map_err(|_| not_found())?;
        self.collection.get(id).map_err(internal)?.ok_or_else(not_found)
    }

    fn parse_input(body: Value) -> Result<R::Input, ApiError> {
        let input: R::Input = serde_json::from_value(body).map_err(|e| {
            ApiError::new(
                400,
                codes::VALIDATION,
                format!("Invalid request body: {}", e),
            )
        })?;
        let errors = R::validate(&input);
        if errors.is_empty() {
            Ok(input)
        } else {
            Err(ApiError::new(400, codes::VALIDATION, "Validation failed").with_details(errors))
        }
    }

    fn check_conflict(&self, item: &R) -> Result<(), ApiError> {
        match self.collection.conflict(item).map_err(internal)? {
            Some(field) => {
                let mut details = BTreeMap::new();
                details.insert(field.to_string(), "already exists".to_string());
                Err(ApiError::new(
                    409,
                    codes::CONFLICT,
                    format!("{} {} already exists", R::LABEL, item.lookup_key()),
                )
                .with_details(details))
            }
            None => Ok(()),
        }
    }

    /// Upsert and persist; `previous` is put back in memory if the save fails
    fn store(&self, item: R, previous: Option<&R>) -> Result<R, ApiError> {
        self.collection.upsert(item.clone()).map_err(internal)?;
        if let Err(e) = self.collection.save() {
            self.restore(item.id(), previous);
            return Err(internal(e));
        }
        Ok(item)
    }

    /// Remove and persist; the entity is put back in memory if the save fails
    fn remove(&self, item: &R) -> Result<(), ApiError> {
        self.collection.delete(item.id()).map_err(internal)?;
        if let Err(e) = self.collection.save() {
            self.restore(item.id(), Some(item));
            return Err(internal(e));
        }
        Ok(())
    }

    fn restore(&self, id: R::Id, previous: Option<&R>) {
        let restored = match previous {
            Some(item) => self.collection.upsert(item.clone()),
            None => self.collection.delete(id).map(|_| ()),
        };
        if let Err(e) = restored {
            log::error!("Failed to roll back {} {}: {}", R::LABEL, id, e);
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, ApiError> {
        self.writes
            .lock()
            .map_err(|e| internal(LedgerError::Storage(format!("Write lock poisoned: {}", e))))
    }
}

impl<R: Resource> ResourceHandler for CollectionHandler<R> {
    fn list(&self, params: &ListParams) -> Result<Answer, ApiError> {
        let facets: Vec<(&String, &String)> = params
            .filters
            .iter()
            .filter(|(key, _)| {
                let known = R::FACETS.contains(&key.as_str());
                if !known {
                    log::debug!("Ignoring unknown filter '{}' on {}", key, R::PATH);
                }
                known
            })
            .collect();

        let matching: Vec<R> = self
            .collection
            .get_all()
            .map_err(internal)?
            .into_iter()
            .filter(|item| {
                params
                    .search
                    .as_deref()
                    .map_or(true, |needle| item.matches_search(needle))
            })
            .filter(|item| {
                facets.iter().all(|(key, value)| {
                    item.facet(key)
                        .is_some_and(|actual| actual.eq_ignore_ascii_case(value))
                })
            })
            .collect();

        let pagination = Pagination::new(params.page, params.limit, matching.len() as u64);
        let data: Vec<R> = matching
            .into_iter()
            .skip(params.offset())
            .take(params.limit as usize)
            .collect();

        Ok((200, json!({ "data": data, "pagination": pagination })))
    }

    fn get(&self, id: &str) -> Result<Answer, ApiError> {
        let item = self.find(id)?;
        Ok((200, json!({ "data": item })))
    }

    fn create(&self, body: Value, ctx: &RequestContext) -> Result<Answer, ApiError> {
        let input = Self::parse_input(body)?;
        let _guard = self.lock()?;

        let item = R::build(R::new_id(), input, chrono::Utc::now());
        self.check_conflict(&item)?;
        let item = self.store(item, None)?;

        log::info!("Created {} {}", R::LABEL, item.lookup_key());
        ctx.record(AuditEntry::create(
            R::ENTITY,
            item.id().to_string(),
            Some(item.display_name()),
            &item,
        ));
        Ok((
            201,
            json!({ "data": item, "message": format!("{} created", R::LABEL) }),
        ))
    }

    fn update(&self, id: &str, body: Value, ctx: &RequestContext) -> Result<Answer, ApiError> {
        let _guard = self.lock()?;
        let before = self.find(id)?;
        before.guard_update().map_err(rule_error)?;
        let input = Self::parse_input(body)?;

        let mut item = before.clone();
        item.apply(input, chrono::Utc::now());
        self.check_conflict(&item)?;
        let item = self.store(item, Some(&before))?;

        log::info!("Updated {} {}", R::LABEL, item.lookup_key());
        ctx.record(AuditEntry::change(
            Operation::Update,
            R::ENTITY,
            item.id().to_string(),
            Some(item.display_name()),
            &before,
            &item,
        ));
        Ok((
            200,
            json!({ "data": item, "message": format!("{} updated", R::LABEL) }),
        ))
    }

    fn delete(&self, id: &str, ctx: &RequestContext) -> Result<Answer, ApiError> {
        let _guard = self.lock()?;
        let before = self.find(id)?;
        before.guard_delete().map_err(rule_error)?;

        if R::SOFT_DELETE {
            let mut item = before.clone();
            item.deactivate(chrono::Utc::now());
            let item = self.store(item, Some(&before))?;

            log::info!("Deactivated {} {}", R::LABEL, item.lookup_key());
            ctx.record(AuditEntry::change(
                Operation::Delete,
                R::ENTITY,
                item.id().to_string(),
                Some(item.display_name()),
                &before,
                &item,
            ));
            return Ok((
                200,
                json!({ "data": item, "message": format!("{} deactivated", R::LABEL) }),
            ));
        }

        self.remove(&before)?;

        log::info!("Deleted {} {}", R::LABEL, before.lookup_key());
        ctx.record(AuditEntry::delete(
            R::ENTITY,
            before.id().to_string(),
            Some(before.display_name()),
            &before,
        ));
        Ok((
            200,
            json!({ "data": null, "message": format!("{} deleted", R::LABEL) }),
        ))
    }

    fn action(&self, id: &str, action: &str, ctx: &RequestContext) -> Result<Answer, ApiError> {
        let _guard = self.lock()?;
        let before = self.find(id)?;

        let mut item = before.clone();
        let action_ctx = ActionContext::new(ctx.user_id.clone());
        match item.perform(action, &action_ctx) {
            None => {
                return Err(ApiError::new(
                    404,
                    codes::NOT_FOUND,
                    format!("{} has no action '{}'", R::LABEL, action),
                ))
            }
            Some(Err(violation)) => return Err(rule_error(violation)),
            Some(Ok(())) => {}
        }
        let item = self.store(item, Some(&before))?;

        log::info!("{} {} {}", action, R::LABEL, item.lookup_key());
        ctx.record(AuditEntry::change(
            Operation::from_action(action).unwrap_or(Operation::Update),
            R::ENTITY,
            item.id().to_string(),
            Some(item.display_name()),
            &before,
            &item,
        ));
        Ok((200, json!({ "data": item })))
    }
}

fn rule_error(violation: RuleViolation) -> ApiError {
    ApiError::new(422, codes::BUSINESS_RULE, violation.message).with_rule(violation.rule)
}

fn internal(err: LedgerError) -> ApiError {
    log::error!("{}", err);
    ApiError::new(500, codes::INTERNAL, err.to_string())
}
