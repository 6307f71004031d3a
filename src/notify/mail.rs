use std::sync::atomic::{AtomicU64, Ordering};

/// Who a promise letter is sent from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Sender {
    /// Display name.
    pub name: String,
    /// Sending address.
    pub email: String,
}

/// A single message addressed to one recipient.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OutgoingMail {
    /// Sender.
    pub sender: Sender,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain-text body.
    pub text: String,
}

/// Provider-assigned id of an accepted message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct MessageId(pub String);

/// Failure of one send attempt.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The provider answered with an error.
    #[error("provider rejected message ({status}): {body}")]
    Rejected {
        /// HTTP status.
        status: u16,
        /// Response body.
        body: String,
    },
    /// The provider could not be reached.
    #[error("network error: {0}")]
    Network(String),
    /// The provider did not answer in time.
    #[error("request timed out")]
    Timeout,
}

impl TransportError {
    /// Message suitable for showing to the person who pressed the button.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { body, .. } => format!("Mail provider error: {body}"),
            Self::Network(_) => "Network error. Please check your internet connection.".to_string(),
            Self::Timeout => {
                "Connection timed out. Please check your internet connection.".to_string()
            }
        }
    }
}

/// Transactional mail provider.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    /// Attempt to send `mail` once.
    async fn send(&self, mail: &OutgoingMail) -> Result<MessageId, TransportError>;
}

/// The fixed "promise" letter sent to both partners.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PromiseLetter {
    /// Sender identity.
    pub sender: Sender,
    /// Recipient addresses; each gets its own mail.
    pub recipients: Vec<String>,
    /// Human-readable date printed in the footer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_on: Option<String>,
}

const SUBJECT: &str = "💕 Promise Made Forever";
const PROMISE: &str = "We promise to never leave each other, no matter what storms come or how hard life gets.";

impl PromiseLetter {
    /// Letter from `sender` to `recipients`.
    pub fn new(sender: Sender, recipients: Vec<String>) -> Self {
        Self {
            sender,
            recipients,
            signed_on: None,
        }
    }

    /// Plain-text body.
    pub fn text_body(&self) -> String {
        format!("Promise made forever 💕 - {PROMISE}")
    }

    /// HTML body.
    pub fn html_body(&self) -> String {
        let footer = match &self.signed_on {
            Some(date) => format!("<div class=\"footer\">Sent with love on {date}</div>"),
            None => String::new(),
        };
        format!(
            "<!DOCTYPE html><html><body><div class=\"container\">\
             <h1>Our Promise</h1><div class=\"heart\">💕</div>\
             <div class=\"promise-text\"><strong>Promise made forever</strong><br><br>{PROMISE}\
             <br><br>This isn't just a moment, this is our forever.</div>\
             <div class=\"heart\">❤️</div>{footer}</div></body></html>"
        )
    }

    /// The mail addressed to `to`.
    pub fn mail_for(&self, to: &str) -> OutgoingMail {
        OutgoingMail {
            sender: self.sender.clone(),
            to: to.to_string(),
            subject: SUBJECT.to_string(),
            html: self.html_body(),
            text: self.text_body(),
        }
    }
}

/// Transport that only logs. Optionally fails the first `fail_first` attempts per call
/// sequence, to exercise retries.
#[derive(Debug, Default)]
pub struct DryRunTransport {
    fail_first: u64,
    attempts: AtomicU64,
}

impl DryRunTransport {
    /// Transport whose first `fail_first` attempts report a network error.
    pub fn failing_first(fail_first: u64) -> Self {
        Self {
            fail_first,
            attempts: AtomicU64::new(0),
        }
    }

    /// Attempts made so far.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MailTransport for DryRunTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<MessageId, TransportError> {
        let n = self.attempts.fetch_add(1, Ordering::SeqCst);
        if n < self.fail_first {
            tracing::info!(to = %mail.to, attempt = n + 1, "dry run: simulated failure");
            return Err(TransportError::Network("simulated".to_string()));
        }
        tracing::info!(to = %mail.to, subject = %mail.subject, "dry run: mail accepted");
        Ok(MessageId(format!("dry-run-{n}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/notify/mail.rs"]
mod tests;
