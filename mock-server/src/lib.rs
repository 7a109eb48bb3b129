use std::{
    collections::BTreeMap,
    sync::{Arc, LazyLock},
};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

const FULL_NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 100;
const PHONE_MAX: usize = 20;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)*$").expect("static regex"));

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Write payload. Missing fields default to empty so they surface as
/// validation errors rather than JSON rejections.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonRequest {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

type Reply<T> = (StatusCode, Json<Envelope<T>>);

fn success<T>(status: StatusCode, message: &str, data: Option<T>) -> Reply<T> {
    (
        status,
        Json(Envelope {
            success: true,
            message: message.to_string(),
            data,
            errors: Vec::new(),
        }),
    )
}

fn failure<T>(status: StatusCode, message: impl Into<String>) -> Reply<T> {
    (
        status,
        Json(Envelope {
            success: false,
            message: message.into(),
            data: None,
            errors: Vec::new(),
        }),
    )
}

fn invalid<T>(errors: Vec<FieldError>) -> Reply<T> {
    (
        StatusCode::BAD_REQUEST,
        Json(Envelope {
            success: false,
            message: "Validation errors".to_string(),
            data: None,
            errors,
        }),
    )
}

fn not_found<T>(id: u64) -> Reply<T> {
    failure(StatusCode::NOT_FOUND, format!("Person not found with ID: {id}"))
}

#[derive(Debug, Default)]
pub struct Store {
    last_id: u64,
    persons: BTreeMap<u64, Person>,
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<u64>) -> bool {
        self.persons
            .values()
            .any(|p| p.email == email && Some(p.id) != except)
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Routes relative to the API root (`/persons`, ...).
pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/persons", get(list_persons).post(create_person))
        .route(
            "/persons/{id}",
            get(get_person).put(update_person).delete(delete_person),
        )
        .route("/persons/email/{email}", get(find_by_email))
        .with_state(db)
}

/// `app()` mounted under `{context_path}/api`.
pub fn app_at(context_path: &str) -> Router {
    let trimmed = context_path.trim().trim_matches('/');
    let prefix = if trimmed.is_empty() {
        "/api".to_string()
    } else {
        format!("/{trimmed}/api")
    };
    Router::new().nest(&prefix, app())
}

pub async fn run(listener: TcpListener, context_path: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_at(context_path)).await
}

pub fn validate(input: &PersonRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let mut push = |field: &str, message: &str| {
        errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        })
    };

    if input.full_name.trim().is_empty() {
        push("fullName", "Full name is required");
    }
    if input.full_name.chars().count() > FULL_NAME_MAX {
        push("fullName", "Full name cannot exceed 100 characters");
    }

    if input.email.trim().is_empty() {
        push("email", "Email is required");
    } else if !EMAIL_RE.is_match(&input.email) {
        push("email", "Email must be valid");
    }
    if input.email.chars().count() > EMAIL_MAX {
        push("email", "Email cannot exceed 100 characters");
    }

    if input.phone_number.trim().is_empty() {
        push("phoneNumber", "Phone number is required");
    }
    if input.phone_number.chars().count() > PHONE_MAX {
        push("phoneNumber", "Phone number cannot exceed 20 characters");
    }

    errors
}

/// Unwrap a JSON body, turning rejections and field violations into a 400
/// validation envelope.
fn checked_body<T>(payload: Result<Json<PersonRequest>, JsonRejection>) -> Result<PersonRequest, Reply<T>> {
    let Json(input) = payload.map_err(|rejection| {
        invalid(vec![FieldError {
            field: "body".to_string(),
            message: rejection.body_text(),
        }])
    })?;
    let errors = validate(&input);
    if errors.is_empty() {
        Ok(input)
    } else {
        Err(invalid(errors))
    }
}

fn checked_id<T>(id: Result<Path<u64>, PathRejection>) -> Result<u64, Reply<T>> {
    id.map(|Path(id)| id)
        .map_err(|_| failure(StatusCode::BAD_REQUEST, "Invalid person id"))
}

async fn list_persons(State(db): State<Db>) -> Reply<Vec<Person>> {
    let store = db.read().await;
    let persons = store.persons.values().cloned().collect();
    success(StatusCode::OK, "Persons retrieved successfully", Some(persons))
}

async fn get_person(
    State(db): State<Db>,
    id: Result<Path<u64>, PathRejection>,
) -> Reply<Person> {
    let id = match checked_id(id) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let store = db.read().await;
    match store.persons.get(&id) {
        Some(person) => success(StatusCode::OK, "Person found", Some(person.clone())),
        None => not_found(id),
    }
}

async fn find_by_email(
    State(db): State<Db>,
    email: Result<Path<String>, PathRejection>,
) -> Reply<Person> {
    let Ok(Path(email)) = email else {
        return failure(StatusCode::BAD_REQUEST, "Invalid email");
    };
    let store = db.read().await;
    match store.persons.values().find(|p| p.email == email) {
        Some(person) => success(StatusCode::OK, "Person found", Some(person.clone())),
        None => failure(
            StatusCode::NOT_FOUND,
            format!("Person not found with email: {email}"),
        ),
    }
}

async fn create_person(
    State(db): State<Db>,
    payload: Result<Json<PersonRequest>, JsonRejection>,
) -> Reply<Person> {
    let input = match checked_body(payload) {
        Ok(input) => input,
        Err(reply) => return reply,
    };

    let mut store = db.write().await;
    if store.email_taken(&input.email, None) {
        return failure(
            StatusCode::BAD_REQUEST,
            format!("A person with email {} already exists", input.email),
        );
    }

    store.last_id += 1;
    let now = Local::now().naive_local();
    let person = Person {
        id: store.last_id,
        full_name: input.full_name,
        email: input.email,
        phone_number: input.phone_number,
        created_at: now,
        updated_at: now,
    };
    store.persons.insert(person.id, person.clone());
    tracing::info!(id = person.id, "person created");
    success(StatusCode::CREATED, "Person created successfully", Some(person))
}

async fn update_person(
    State(db): State<Db>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<PersonRequest>, JsonRejection>,
) -> Reply<Person> {
    let id = match checked_id(id) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let input = match checked_body(payload) {
        Ok(input) => input,
        Err(reply) => return reply,
    };

    let mut store = db.write().await;
    if !store.persons.contains_key(&id) {
        return not_found(id);
    }
    if store.email_taken(&input.email, Some(id)) {
        return failure(
            StatusCode::BAD_REQUEST,
            "Email is already in use by another person",
        );
    }

    let Some(person) = store.persons.get_mut(&id) else {
        return not_found(id);
    };
    person.full_name = input.full_name;
    person.email = input.email;
    person.phone_number = input.phone_number;
    person.updated_at = Local::now().naive_local();
    tracing::info!(id, "person updated");
    success(StatusCode::OK, "Person updated successfully", Some(person.clone()))
}

async fn delete_person(
    State(db): State<Db>,
    id: Result<Path<u64>, PathRejection>,
) -> Reply<()> {
    let id = match checked_id(id) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let mut store = db.write().await;
    match store.persons.remove(&id) {
        Some(_) => {
            tracing::info!(id, "person deleted");
            success(StatusCode::OK, "Person deleted successfully", None)
        }
        None => not_found(id),
    }
}
