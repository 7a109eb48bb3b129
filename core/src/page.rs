//! The persons page: list, form and error banner state behind the table UI.
//!
//! # Design
//! `PersonsPage` owns UI state only. Every user action runs to completion on
//! the caller's thread: set `loading`, call the client, update state, clear
//! `loading`. The list is never patched locally; after every successful
//! mutation it is replaced by a full re-fetch, so what is displayed is always
//! the last list the server returned.
//!
//! Two kinds of failure reach the banner. An envelope with `success: false`
//! shows the server's `message`. A transport or decode fault shows the
//! generic message of the operation.

use crate::client::PersonClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{Envelope, FieldError, Person, PersonId, PersonRequest};

pub const FETCH_FAILED: &str = "Could not connect to the server";
pub const SAVE_FAILED: &str = "Could not save the person";
pub const DELETE_FAILED: &str = "Could not delete the person";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FullName,
    Email,
    PhoneNumber,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::FullName, FormField::Email, FormField::PhoneNumber];

    pub fn label(self) -> &'static str {
        match self {
            FormField::FullName => "Full name",
            FormField::Email => "Email",
            FormField::PhoneNumber => "Phone number",
        }
    }
}

/// The three editable fields of the create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonForm {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
}

impl PersonForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::FullName => &self.full_name,
            FormField::Email => &self.email,
            FormField::PhoneNumber => &self.phone_number,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::FullName => &mut self.full_name,
            FormField::Email => &mut self.email,
            FormField::PhoneNumber => &mut self.phone_number,
        };
        *slot = value.into();
    }

    /// Every field is required; whitespace alone does not count.
    pub fn is_complete(&self) -> bool {
        FormField::ALL.iter().all(|f| !self.get(*f).trim().is_empty())
    }

    pub fn to_request(&self) -> PersonRequest {
        PersonRequest {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}

impl From<&Person> for PersonForm {
    fn from(p: &Person) -> Self {
        Self {
            full_name: p.full_name.clone(),
            email: p.email.clone(),
            phone_number: p.phone_number.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A required field is blank; nothing was sent.
    Incomplete,
    Saved,
    /// The server answered `success: false`.
    Rejected,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The confirmation prompt was declined; nothing was sent.
    Cancelled,
    Deleted,
    Rejected,
    Failed,
}

pub struct PersonsPage<T: Transport> {
    client: PersonClient,
    transport: T,
    persons: Vec<Person>,
    loading: bool,
    error: Option<String>,
    field_errors: Vec<FieldError>,
    form_open: bool,
    editing: Option<Person>,
    form: PersonForm,
}

impl<T: Transport> PersonsPage<T> {
    pub fn new(client: PersonClient, transport: T) -> Self {
        Self {
            client,
            transport,
            persons: Vec::new(),
            loading: false,
            error: None,
            field_errors: Vec::new(),
            form_open: false,
            editing: None,
            form: PersonForm::default(),
        }
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn find(&self, id: &PersonId) -> Option<&Person> {
        self.persons.iter().find(|p| &p.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    pub fn editing(&self) -> Option<&Person> {
        self.editing.as_ref()
    }

    pub fn form(&self) -> &PersonForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PersonForm {
        &mut self.form
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn client(&self) -> &PersonClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Initial load when the page is first shown.
    pub fn mount(&mut self) -> bool {
        self.refresh()
    }

    /// Replace the list with the server's current one. Returns whether the
    /// list was replaced.
    pub fn refresh(&mut self) -> bool {
        self.begin();
        let replaced = self.fetch();
        self.loading = false;
        replaced
    }

    pub fn open_new(&mut self) {
        self.editing = None;
        self.form = PersonForm::default();
        self.field_errors.clear();
        self.form_open = true;
    }

    pub fn edit(&mut self, person: &Person) {
        self.form = PersonForm::from(person);
        self.editing = Some(person.clone());
        self.field_errors.clear();
        self.form_open = true;
    }

    /// Close the form and forget its contents.
    pub fn cancel(&mut self) {
        self.form = PersonForm::default();
        self.editing = None;
        self.form_open = false;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
        self.field_errors.clear();
    }

    /// Create the form's person, or update the one being edited. On success
    /// the list is re-fetched and the form closed.
    pub fn submit(&mut self) -> SubmitOutcome {
        if !self.form.is_complete() {
            return SubmitOutcome::Incomplete;
        }
        self.begin();

        let input = self.form.to_request();
        let result = match &self.editing {
            Some(person) => self.client.update_person(&self.transport, &person.id, &input),
            None => self.client.create_person(&self.transport, &input),
        };

        let outcome = match result {
            Ok(env) if env.success => {
                tracing::info!(editing = self.editing.is_some(), "person saved");
                self.fetch();
                self.cancel();
                SubmitOutcome::Saved
            }
            Ok(env) => {
                self.reject(env, SAVE_FAILED);
                SubmitOutcome::Rejected
            }
            Err(err) => {
                self.fail(&err, SAVE_FAILED);
                SubmitOutcome::Failed
            }
        };
        self.loading = false;
        outcome
    }

    /// Delete `id` once `confirm` agrees, then re-fetch the list.
    pub fn delete<F>(&mut self, id: &PersonId, confirm: F) -> DeleteOutcome
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            return DeleteOutcome::Cancelled;
        }
        self.begin();

        let outcome = match self.client.delete_person(&self.transport, id) {
            Ok(env) if env.success => {
                tracing::info!(%id, "person deleted");
                self.fetch();
                DeleteOutcome::Deleted
            }
            Ok(env) => {
                self.reject(env, DELETE_FAILED);
                DeleteOutcome::Rejected
            }
            Err(err) => {
                self.fail(&err, DELETE_FAILED);
                DeleteOutcome::Failed
            }
        };
        self.loading = false;
        outcome
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.field_errors.clear();
    }

    fn fetch(&mut self) -> bool {
        match self.client.list_persons(&self.transport) {
            Ok(env) if env.success => {
                self.persons = env.data.unwrap_or_default();
                tracing::debug!(count = self.persons.len(), "persons loaded");
                true
            }
            Ok(env) => {
                self.reject(env, FETCH_FAILED);
                false
            }
            Err(err) => {
                self.fail(&err, FETCH_FAILED);
                false
            }
        }
    }

    fn reject<D>(&mut self, env: Envelope<D>, fallback: &str) {
        self.error = Some(env.message_or(fallback).to_string());
        self.field_errors = env.errors;
    }

    fn fail(&mut self, err: &ApiError, generic: &str) {
        tracing::error!(error = %err, "{generic}");
        self.error = Some(generic.to_string());
    }
}
