//! `Transport` backed by a blocking ureq agent.

use person_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};
use ureq::RequestBuilder;

/// Every response is handed back as data, 4xx and 5xx included; only a
/// failed connection or an unreadable body is an error.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = &self.agent;
        let headers = &req.headers;
        let sent = match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(agent.get(&req.path), headers).call(),
            (HttpMethod::Delete, _) => with_headers(agent.delete(&req.path), headers).call(),
            (HttpMethod::Post, Some(body)) => with_headers(agent.post(&req.path), headers).send(body.as_bytes()),
            (HttpMethod::Post, None) => with_headers(agent.post(&req.path), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(agent.put(&req.path), headers).send(body.as_bytes()),
            (HttpMethod::Put, None) => with_headers(agent.put(&req.path), headers).send_empty(),
        };
        let mut response = sent.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}
