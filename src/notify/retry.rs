use std::time::Duration;

use futures::future::join_all;

use crate::{
    foundation::error::{TrailError, TrailResult},
    notify::mail::{MailTransport, MessageId, OutgoingMail, PromiseLetter, TransportError},
};

/// Bounded retries with exponential backoff.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay after the first failure; doubled after each further failure.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait after failed attempt `attempt` (1-based): `base_delay * 2^(attempt - 1)`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exp)
    }
}

/// Send one mail, retrying per `policy`. Returns the last error once attempts run out.
pub async fn send_with_retry<T: MailTransport + ?Sized>(
    transport: &T,
    mail: &OutgoingMail,
    policy: &RetryPolicy,
) -> Result<MessageId, TransportError> {
    let max = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match transport.send(mail).await {
            Ok(id) => return Ok(id),
            Err(e) if attempt >= max => {
                tracing::warn!(to = %mail.to, attempt, error = %e, "giving up");
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    to = %mail.to,
                    attempt,
                    max,
                    retry_in_ms = delay.as_millis() as u64,
                    error = %e,
                    "send failed; retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// A mail that went out.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Delivered {
    /// Recipient address.
    pub recipient: String,
    /// Provider id.
    pub message_id: MessageId,
}

/// A mail that did not go out.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Undelivered {
    /// Recipient address.
    pub recipient: String,
    /// Last error, phrased for display.
    pub error: String,
}

/// Per-recipient outcome of one send request. Partial failure is a normal result.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct DeliveryReport {
    /// Mails accepted by the provider, in recipient order.
    pub successful: Vec<Delivered>,
    /// Mails that failed every attempt, in recipient order.
    pub failed: Vec<Undelivered>,
}

impl DeliveryReport {
    /// At least one mail went out.
    pub fn is_success(&self) -> bool {
        !self.successful.is_empty()
    }

    /// "N email(s) sent successfully", plus ", M failed" when something failed.
    pub fn summary(&self) -> String {
        let mut s = format!("{} email(s) sent successfully", self.successful.len());
        if !self.failed.is_empty() {
            s.push_str(&format!(", {} failed", self.failed.len()));
        }
        s
    }

    /// `Err` when nothing was delivered.
    pub fn into_result(self) -> TrailResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let first = self
            .failed
            .first()
            .map(|f| format!(": {}", f.error))
            .unwrap_or_default();
        Err(TrailError::delivery(format!("{}{first}", self.summary())))
    }
}

/// Send the letter to every recipient concurrently, each with independent retries.
#[tracing::instrument(skip_all, fields(recipients = letter.recipients.len()))]
pub async fn deliver_promise<T: MailTransport + ?Sized>(
    transport: &T,
    letter: &PromiseLetter,
    policy: &RetryPolicy,
) -> DeliveryReport {
    let sends = letter.recipients.iter().map(|to| async move {
        let mail = letter.mail_for(to);
        (to.clone(), send_with_retry(transport, &mail, policy).await)
    });

    let mut report = DeliveryReport::default();
    for (recipient, result) in join_all(sends).await {
        match result {
            Ok(message_id) => report.successful.push(Delivered {
                recipient,
                message_id,
            }),
            Err(e) => report.failed.push(Undelivered {
                recipient,
                error: e.user_message(),
            }),
        }
    }
    tracing::info!(summary = %report.summary(), "promise delivery finished");
    report
}

#[cfg(test)]
#[path = "../../tests/unit/notify/retry.rs"]
mod tests;
