use std::{collections::HashMap, sync::Mutex};

use super::*;
use crate::notify::mail::Sender;

/// Fails each recipient a scripted number of times, recording attempt times.
#[derive(Default)]
struct Scripted {
    failures: Mutex<HashMap<String, u32>>,
    attempts: Mutex<Vec<(String, tokio::time::Instant)>>,
}

impl Scripted {
    fn new(script: &[(&str, u32)]) -> Self {
        let failures = script
            .iter()
            .map(|(to, n)| (to.to_string(), *n))
            .collect();
        Self {
            failures: Mutex::new(failures),
            attempts: Mutex::new(Vec::new()),
        }
    }

    fn attempts_for(&self, to: &str) -> Vec<tokio::time::Instant> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| r == to)
            .map(|(_, at)| *at)
            .collect()
    }
}

#[async_trait::async_trait]
impl MailTransport for Scripted {
    async fn send(&self, mail: &OutgoingMail) -> Result<MessageId, TransportError> {
        self.attempts
            .lock()
            .unwrap()
            .push((mail.to.clone(), tokio::time::Instant::now()));
        let mut failures = self.failures.lock().unwrap();
        let left = failures.entry(mail.to.clone()).or_insert(0);
        if *left > 0 {
            *left -= 1;
            return Err(TransportError::Timeout);
        }
        Ok(MessageId(format!("id-{}", mail.to)))
    }
}

fn letter() -> PromiseLetter {
    PromiseLetter::new(
        Sender {
            name: "Our Journey".to_string(),
            email: "journey@example.com".to_string(),
        },
        vec!["a@example.com".to_string(), "b@example.com".to_string()],
    )
}

#[test]
fn backoff_doubles_from_the_base_delay() {
    let p = RetryPolicy::default();
    assert_eq!(p.delay_after(1), Duration::from_secs(1));
    assert_eq!(p.delay_after(2), Duration::from_secs(2));
    assert_eq!(p.delay_after(3), Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn retries_until_success_with_backoff() {
    let t = Scripted::new(&[("a@example.com", 2)]);
    let mail = letter().mail_for("a@example.com");
    let id = send_with_retry(&t, &mail, &RetryPolicy::default())
        .await
        .unwrap();
    assert_eq!(id, MessageId("id-a@example.com".to_string()));

    let at = t.attempts_for("a@example.com");
    assert_eq!(at.len(), 3);
    assert!(at[1] - at[0] >= Duration::from_secs(1));
    assert!(at[2] - at[1] >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn gives_up_after_max_attempts() {
    let t = Scripted::new(&[("a@example.com", 10)]);
    let mail = letter().mail_for("a@example.com");
    let err = send_with_retry(&t, &mail, &RetryPolicy::default())
        .await
        .unwrap_err();
    assert_eq!(err, TransportError::Timeout);
    assert_eq!(t.attempts_for("a@example.com").len(), 3);
}

#[tokio::test(start_paused = true)]
async fn partial_failure_is_reported_per_recipient() {
    let t = Scripted::new(&[("b@example.com", 3)]);
    let report = deliver_promise(&t, &letter(), &RetryPolicy::default()).await;

    assert!(report.is_success());
    assert_eq!(report.successful.len(), 1);
    assert_eq!(report.successful[0].recipient, "a@example.com");
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].recipient, "b@example.com");
    assert!(report.failed[0].error.contains("timed out"));
    assert_eq!(report.summary(), "1 email(s) sent successfully, 1 failed");
    assert!(report.into_result().is_ok());

    // One recipient's retries never delay the other's first attempt.
    let a = t.attempts_for("a@example.com");
    let b = t.attempts_for("b@example.com");
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 3);
    assert!(a[0] <= b[1]);
}

#[tokio::test(start_paused = true)]
async fn total_failure_becomes_a_delivery_error() {
    let t = Scripted::new(&[("a@example.com", 3), ("b@example.com", 3)]);
    let report = deliver_promise(&t, &letter(), &RetryPolicy::default()).await;
    assert!(!report.is_success());
    assert_eq!(report.summary(), "0 email(s) sent successfully, 2 failed");
    let err = report.into_result().unwrap_err();
    assert!(matches!(err, TrailError::Delivery(_)));
}
