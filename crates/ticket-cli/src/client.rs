use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use ticket_form::{ServiceError, TicketDraft, TicketId, TicketService};
use url::Url;

/// Create-ticket operation backed by the marketplace HTTP API.
pub struct HttpTicketService {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTicketService {
    /// Point the service at the API base URL; drafts POST to `<base>/tickets`.
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(&format!("{}/tickets", base.trim_end_matches('/')))?;
        Ok(HttpTicketService {
            client: reqwest::Client::new(),
            endpoint,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CreateTicketResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<String>,
    error: Option<String>,
}

#[async_trait]
impl TicketService for HttpTicketService {
    async fn create_ticket(&self, draft: &TicketDraft) -> Result<TicketId, ServiceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(draft)
            .send()
            .await
            .map_err(|err| ServiceError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ServiceError::Transport(err.to_string()))?;

        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "ticket accepted");
            let id = serde_json::from_str::<CreateTicketResponse>(&body)
                .map(|created| created.id)
                .unwrap_or_else(|_| body.trim().to_string());
            return Ok(TicketId(id));
        }

        Err(ServiceError::Rejected(rejection_message(
            &body,
            status.as_u16(),
        )))
    }
}

/// The server's own message field when it has one, else a status line in
/// the same shape the web client reports.
fn rejection_message(body: &str, status: u16) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.detail).or(parsed.error))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status code {}", status))
}

/// Create-ticket operation that records the payload instead of sending it.
pub struct DryRunService {
    out: Option<PathBuf>,
}

impl DryRunService {
    /// Write the draft to the given path, or to stdout when none is set.
    pub fn new(out: Option<PathBuf>) -> Self {
        DryRunService { out }
    }
}

#[async_trait]
impl TicketService for DryRunService {
    async fn create_ticket(&self, draft: &TicketDraft) -> Result<TicketId, ServiceError> {
        let pretty = serde_json::to_string_pretty(draft)
            .map_err(|err| ServiceError::Transport(err.to_string()))?;
        match &self.out {
            Some(path) => {
                fs::write(path, pretty).map_err(|err| ServiceError::Transport(err.to_string()))?;
            }
            None => println!("{}", pretty),
        }
        Ok(TicketId("dry-run".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_prefers_the_message_field() {
        let body = r#"{"message": "An account with this email already exists"}"#;
        assert_eq!(
            rejection_message(body, 409),
            "An account with this email already exists"
        );
    }

    #[test]
    fn rejection_falls_back_through_detail_and_error() {
        let body = r#"{"detail": "interest rate out of bounds"}"#;
        assert_eq!(rejection_message(body, 422), "interest rate out of bounds");

        let body = r#"{"error": "bad request"}"#;
        assert_eq!(rejection_message(body, 400), "bad request");
    }

    #[test]
    fn unreadable_bodies_report_the_status_line() {
        assert_eq!(
            rejection_message("<html>oops</html>", 500),
            "Request failed with status code 500"
        );
        assert_eq!(
            rejection_message(r#"{"message": ""}"#, 503),
            "Request failed with status code 503"
        );
    }

    #[test]
    fn endpoint_always_lands_on_tickets() {
        let service = HttpTicketService::new("https://api.peerlend.io/v1/").unwrap();
        assert_eq!(
            service.endpoint.as_str(),
            "https://api.peerlend.io/v1/tickets"
        );

        let service = HttpTicketService::new("https://api.peerlend.io/v1").unwrap();
        assert_eq!(
            service.endpoint.as_str(),
            "https://api.peerlend.io/v1/tickets"
        );
    }
}
