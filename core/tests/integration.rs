//! Full page lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `PersonsPage` over
//! real HTTP using ureq. Validates that request building, envelope parsing
//! and the page's re-fetch discipline work end-to-end with the actual server.

use person_core::{
    page::{DELETE_FAILED, FETCH_FAILED},
    ApiError, DeleteOutcome, FormField, HttpMethod, HttpRequest, HttpResponse, PersonClient,
    PersonId, PersonsPage, SubmitOutcome, Transport,
};

/// Executes `HttpRequest`s with ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// interpret the envelope. Only `content-type` matters to the server, so the
/// other request headers are not forwarded.
struct UreqTransport(ureq::Agent);

impl UreqTransport {
    fn new() -> Self {
        Self(ureq::Agent::config_builder().http_status_as_error(false).build().new_agent())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = &self.0;
        let result = match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => agent.get(&req.path).call(),
            (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
            (HttpMethod::Post, Some(body)) => agent.post(&req.path).content_type("application/json").send(body.as_bytes()),
            (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
            (HttpMethod::Put, Some(body)) => agent.put(&req.path).content_type("application/json").send(body.as_bytes()),
            (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, "/sgu-api").await
        })
        .unwrap();
    });

    addr
}

fn fill(page: &mut PersonsPage<UreqTransport>, name: &str, email: &str, phone: &str) {
    page.set_field(FormField::FullName, name);
    page.set_field(FormField::Email, email);
    page.set_field(FormField::PhoneNumber, phone);
}

#[test]
fn page_lifecycle() {
    let addr = start_server();
    let client = PersonClient::new(&format!("http://{addr}/sgu-api/api"));
    let mut page = PersonsPage::new(client, UreqTransport::new());

    // Step 1: mount, empty list.
    assert!(page.mount(), "mount failed: {:?}", page.error());
    assert!(page.persons().is_empty());

    // Step 2: create two persons.
    page.open_new();
    fill(&mut page, "Ada Lovelace", "ada@example.com", "555-0100");
    assert_eq!(page.submit(), SubmitOutcome::Saved);
    assert!(!page.is_form_open());

    page.open_new();
    fill(&mut page, "Alan Turing", "alan@example.com", "555-0101");
    assert_eq!(page.submit(), SubmitOutcome::Saved);
    assert_eq!(page.persons().len(), 2);
    assert_eq!(page.persons()[0].full_name, "Ada Lovelace");
    assert!(page.persons()[0].created_at.is_some());

    // Step 3: duplicate email is shown verbatim and keeps the form.
    page.open_new();
    fill(&mut page, "Ada Again", "ada@example.com", "555-0102");
    assert_eq!(page.submit(), SubmitOutcome::Rejected);
    assert_eq!(page.error(), Some("A person with email ada@example.com already exists"));
    assert!(page.is_form_open());
    page.cancel();
    page.dismiss_error();

    // Step 4: server-side validation errors come back per field.
    page.open_new();
    fill(&mut page, "Bad Email", "not-an-email", "555-0103");
    assert_eq!(page.submit(), SubmitOutcome::Rejected);
    assert_eq!(page.error(), Some("Validation errors"));
    assert_eq!(page.field_errors()[0].field, "email");
    page.cancel();

    // Step 5: edit Ada.
    let ada = page.persons()[0].clone();
    page.edit(&ada);
    page.set_field(FormField::FullName, "Ada King");
    assert_eq!(page.submit(), SubmitOutcome::Saved);
    assert_eq!(page.find(&ada.id).unwrap().full_name, "Ada King");
    assert_eq!(page.persons().len(), 2);

    // Step 6: the client alone can look a person up by email.
    let client = PersonClient::new(&format!("http://{addr}/sgu-api/api"));
    let found = client.find_by_email(page.transport(), "alan@example.com").unwrap();
    assert!(found.success);
    assert_eq!(found.data.unwrap().full_name, "Alan Turing");

    // Step 7: declined delete sends nothing.
    assert_eq!(page.delete(&ada.id, || false), DeleteOutcome::Cancelled);
    assert_eq!(page.persons().len(), 2);

    // Step 8: confirmed delete re-fetches.
    assert_eq!(page.delete(&ada.id, || true), DeleteOutcome::Deleted);
    assert_eq!(page.persons().len(), 1);
    assert!(page.find(&ada.id).is_none());

    // Step 9: deleting again is rejected by the server.
    assert_eq!(page.delete(&ada.id, || true), DeleteOutcome::Rejected);
    assert_eq!(page.error(), Some(format!("Person not found with ID: {}", ada.id).as_str()));
    assert_eq!(page.persons().len(), 1);
    assert!(!page.is_loading());
}

#[test]
fn unreachable_server_shows_generic_messages() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = PersonClient::new(&format!("http://{addr}/sgu-api/api"));
    let mut page = PersonsPage::new(client, UreqTransport::new());

    assert!(!page.mount());
    assert_eq!(page.error(), Some(FETCH_FAILED));
    assert!(!page.is_loading());

    assert_eq!(page.delete(&PersonId::Number(1), || true), DeleteOutcome::Failed);
    assert_eq!(page.error(), Some(DELETE_FAILED));
    assert!(!page.is_loading());
}
