//! Stateless HTTP request builder and response parser for the persons API.
//!
//! # Design
//! `PersonClient` holds only the API URL and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! unsplit methods (`list_persons`, `create_person`, ...) run both halves
//! around one `Transport::execute` call.
//!
//! Parsing never looks at the status code. Whatever envelope the server sent
//! is returned as-is; only a body that is not JSON is an error.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{Envelope, Person, PersonId, PersonRequest};

const JSON: &str = "application/json";

/// Synchronous, stateless client for the persons API.
#[derive(Debug, Clone)]
pub struct PersonClient {
    api_url: String,
}

impl PersonClient {
    /// `api_url` is the prefix every resource path is appended to, e.g.
    /// `http://localhost:8081/sgu-api/api`.
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn build_list_persons(&self) -> HttpRequest {
        self.read(HttpMethod::Get, format!("{}/persons", self.api_url))
    }

    pub fn build_get_person(&self, id: &PersonId) -> HttpRequest {
        self.read(HttpMethod::Get, format!("{}/persons/{id}", self.api_url))
    }

    pub fn build_create_person(&self, input: &PersonRequest) -> Result<HttpRequest, ApiError> {
        self.write(HttpMethod::Post, format!("{}/persons", self.api_url), input)
    }

    pub fn build_update_person(
        &self,
        id: &PersonId,
        input: &PersonRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.write(HttpMethod::Put, format!("{}/persons/{id}", self.api_url), input)
    }

    pub fn build_delete_person(&self, id: &PersonId) -> HttpRequest {
        self.read(HttpMethod::Delete, format!("{}/persons/{id}", self.api_url))
    }

    pub fn build_find_by_email(&self, email: &str) -> HttpRequest {
        let segment = utf8_percent_encode(email, PATH_SEGMENT);
        self.read(HttpMethod::Get, format!("{}/persons/email/{segment}", self.api_url))
    }

    pub fn parse_list_persons(&self, response: HttpResponse) -> Result<Envelope<Vec<Person>>, ApiError> {
        parse_envelope(&response)
    }

    pub fn parse_get_person(&self, response: HttpResponse) -> Result<Envelope<Person>, ApiError> {
        parse_envelope(&response)
    }

    pub fn parse_create_person(&self, response: HttpResponse) -> Result<Envelope<Person>, ApiError> {
        parse_envelope(&response)
    }

    pub fn parse_update_person(&self, response: HttpResponse) -> Result<Envelope<Person>, ApiError> {
        parse_envelope(&response)
    }

    /// Delete replies carry no `data`; anything the server puts there is kept
    /// as raw JSON.
    pub fn parse_delete_person(&self, response: HttpResponse) -> Result<Envelope<Value>, ApiError> {
        parse_envelope(&response)
    }

    pub fn parse_find_by_email(&self, response: HttpResponse) -> Result<Envelope<Person>, ApiError> {
        parse_envelope(&response)
    }

    pub fn list_persons(&self, transport: &dyn Transport) -> Result<Envelope<Vec<Person>>, ApiError> {
        let response = round_trip("list persons", transport, &self.build_list_persons())?;
        self.parse_list_persons(response)
    }

    pub fn get_person(&self, transport: &dyn Transport, id: &PersonId) -> Result<Envelope<Person>, ApiError> {
        let response = round_trip("get person", transport, &self.build_get_person(id))?;
        self.parse_get_person(response)
    }

    pub fn create_person(
        &self,
        transport: &dyn Transport,
        input: &PersonRequest,
    ) -> Result<Envelope<Person>, ApiError> {
        let request = self.build_create_person(input)?;
        let response = round_trip("create person", transport, &request)?;
        self.parse_create_person(response)
    }

    pub fn update_person(
        &self,
        transport: &dyn Transport,
        id: &PersonId,
        input: &PersonRequest,
    ) -> Result<Envelope<Person>, ApiError> {
        let request = self.build_update_person(id, input)?;
        let response = round_trip("update person", transport, &request)?;
        self.parse_update_person(response)
    }

    pub fn delete_person(&self, transport: &dyn Transport, id: &PersonId) -> Result<Envelope<Value>, ApiError> {
        let response = round_trip("delete person", transport, &self.build_delete_person(id))?;
        self.parse_delete_person(response)
    }

    pub fn find_by_email(&self, transport: &dyn Transport, email: &str) -> Result<Envelope<Person>, ApiError> {
        let response = round_trip("find person by email", transport, &self.build_find_by_email(email))?;
        self.parse_find_by_email(response)
    }

    fn read(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: vec![("accept".to_string(), JSON.to_string())],
            body: None,
        }
    }

    fn write(&self, method: HttpMethod, path: String, input: &PersonRequest) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![
                ("accept".to_string(), JSON.to_string()),
                ("content-type".to_string(), JSON.to_string()),
            ],
            body: Some(body),
        })
    }
}

fn round_trip(op: &str, transport: &dyn Transport, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
    tracing::debug!(method = %request.method, path = %request.path, "{op}");
    match transport.execute(request) {
        Ok(response) => {
            tracing::debug!(status = response.status, "{op} answered");
            Ok(response)
        }
        Err(err) => {
            tracing::warn!(error = %err, "{op} failed");
            Err(err)
        }
    }
}

fn parse_envelope<T: DeserializeOwned>(response: &HttpResponse) -> Result<Envelope<T>, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Everything outside RFC 3986 `pchar` is escaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':');
