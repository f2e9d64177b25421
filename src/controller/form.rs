//! Create/edit form state
//!
//! A form opened with an existing entity submits an update, otherwise a
//! create. Local validation runs first; server field errors are merged in and
//! keep the form open.

use crate::error::{FieldErrors, LedgerError};
use crate::models::Resource;
use crate::services::EntityService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode<Id> {
    Create,
    Edit(Id),
}

pub struct FormState<R: Resource> {
    mode: FormMode<R::Id>,
    pub input: R::Input,
    errors: FieldErrors,
    alert: Option<String>,
    open: bool,
}

impl<R: Resource> FormState<R> {
    /// Empty form for a new entity
    pub fn create(input: R::Input) -> Self {
        Self {
            mode: FormMode::Create,
            input,
            errors: FieldErrors::new(),
            alert: None,
            open: true,
        }
    }

    /// Form pre-populated from an existing entity
    pub fn edit(entity: &R) -> Self {
        Self {
            mode: FormMode::Edit(entity.id()),
            input: entity.to_input(),
            errors: FieldErrors::new(),
            alert: None,
            open: true,
        }
    }

    pub fn mode(&self) -> FormMode<R::Id> {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Message of a failure that is not tied to a field
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn cancel(&mut self) {
        self.open = false;
    }

    /// Validate locally and send; `Some` with the saved entity closes the form
    pub fn submit(&mut self, service: &EntityService<R>) -> Option<R> {
        self.errors.clear();
        self.alert = None;

        let local = R::validate(&self.input);
        if !local.is_empty() {
            self.errors = local;
            return None;
        }

        let result = match self.mode {
            FormMode::Create => service.create(&self.input),
            FormMode::Edit(id) => service.update(id, &self.input),
        };

        match result {
            Ok(saved) => {
                self.open = false;
                Some(saved)
            }
            Err(LedgerError::Validation { message, fields }) => {
                if fields.is_empty() {
                    self.alert = Some(message);
                } else {
                    self.errors.extend(fields);
                }
                None
            }
            Err(e) => {
                self.alert = Some(e.to_string());
                None
            }
        }
    }
}
