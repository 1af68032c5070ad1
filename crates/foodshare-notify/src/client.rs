//! Email relay HTTP client.

use crate::template::{render_email_html, status_message};
use foodshare_core::DeliveryStatus;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const MAX_TITLE_LEN: usize = 200;
const MAX_NAME_LEN: usize = 100;
const DEFAULT_SENDER: &str = "FoodShare <onboarding@resend.dev>";

/// Payload for one status update email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusNotification {
    pub delivery_id: String,
    pub new_status: DeliveryStatus,
    /// Donation title shown in the email
    pub subject_title: String,
    pub recipient_email: String,
    pub recipient_name: String,
}

impl StatusNotification {
    /// Validate the payload before anything is rendered or sent.
    /// Returns a list of violations (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.subject_title.is_empty() {
            errors.push("Donation title must not be empty".to_string());
        }
        if self.subject_title.chars().count() > MAX_TITLE_LEN {
            errors.push(format!(
                "Donation title exceeds maximum length ({} chars)",
                MAX_TITLE_LEN
            ));
        }
        if self.recipient_name.is_empty() {
            errors.push("Recipient name must not be empty".to_string());
        }
        if self.recipient_name.chars().count() > MAX_NAME_LEN {
            errors.push(format!(
                "Recipient name exceeds maximum length ({} chars)",
                MAX_NAME_LEN
            ));
        }
        if !is_valid_email(&self.recipient_email) {
            errors.push(format!(
                "Recipient email is not a valid address: {}",
                self.recipient_email
            ));
        }

        errors
    }
}

/// Minimal address shape check: one `@`, non-empty local part, dotted
/// domain, no whitespace. Full RFC validation is the relay's problem.
fn is_valid_email(address: &str) -> bool {
    if address.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

#[derive(Debug, Error)]
pub enum NotifyError {
    /// Malformed payload; nothing was sent.
    #[error("invalid notification payload: {0:?}")]
    Validation(Vec<String>),
    #[error("email relay request failed")]
    Transport(#[from] reqwest::Error),
    #[error("email relay returned status {status}")]
    Relay { status: u16 },
}

#[derive(Debug, Serialize)]
struct EmailRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
}

/// HTTP client for the transactional email relay.
///
/// Callers treat every failure here as non-fatal: the status transition
/// that triggered the email must commit whether or not the relay is
/// reachable.
pub struct NotifyClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    sender: String,
}

impl NotifyClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            api_key: api_key.into(),
            sender: DEFAULT_SENDER.to_string(),
        }
    }

    /// Override the `from` address.
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Send one status update email. Attempted at most once; no retry.
    pub async fn send_status_notification(
        &self,
        note: &StatusNotification,
    ) -> Result<(), NotifyError> {
        let violations = note.validate();
        if !violations.is_empty() {
            return Err(NotifyError::Validation(violations));
        }

        let status = note.new_status.as_str();
        let (subject, message) = status_message(status);
        let request = EmailRequest {
            from: self.sender.clone(),
            to: vec![note.recipient_email.clone()],
            subject,
            html: render_email_html(&note.recipient_name, &note.subject_title, status, &message),
        };

        tracing::debug!(
            delivery_id = %note.delivery_id,
            status = %status,
            "sending delivery status notification"
        );

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status_code = response.status();
        if !status_code.is_success() {
            return Err(NotifyError::Relay {
                status: status_code.as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note() -> StatusNotification {
        StatusNotification {
            delivery_id: "d1".to_string(),
            new_status: DeliveryStatus::InTransit,
            subject_title: "Fresh produce".to_string(),
            recipient_email: "amani@example.org".to_string(),
            recipient_name: "Amani Shelter".to_string(),
        }
    }

    #[test]
    fn well_formed_payload_validates() {
        assert!(note().validate().is_empty());
    }

    #[test]
    fn over_long_title_is_rejected() {
        let mut bad = note();
        bad.subject_title = "x".repeat(201);
        let errors = bad.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("title"));
    }

    #[test]
    fn over_long_name_is_rejected() {
        let mut bad = note();
        bad.recipient_name = "x".repeat(101);
        assert!(!bad.validate().is_empty());
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for address in [
            "",
            "no-at-sign.example.org",
            "@example.org",
            "two@@example.org",
            "spaced user@example.org",
            "user@nodot",
            "user@.org",
            "user@org.",
        ] {
            let mut bad = note();
            bad.recipient_email = address.to_string();
            assert!(
                !bad.validate().is_empty(),
                "expected {:?} to be rejected",
                address
            );
        }
    }

    #[test]
    fn email_request_matches_relay_wire_format() {
        let request = EmailRequest {
            from: DEFAULT_SENDER.to_string(),
            to: vec!["amani@example.org".to_string()],
            subject: "Delivery Complete - FoodShare".to_string(),
            html: "<p>done</p>".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["from"], DEFAULT_SENDER);
        assert_eq!(value["to"][0], "amani@example.org");
        assert!(value["subject"].is_string());
        assert!(value["html"].is_string());
    }

    #[test]
    fn boundary_lengths_are_accepted() {
        let mut edge = note();
        edge.subject_title = "x".repeat(200);
        edge.recipient_name = "y".repeat(100);
        assert!(edge.validate().is_empty());
    }
}
