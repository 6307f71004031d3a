use super::*;
use crate::notify::mail::{DryRunTransport, Sender};

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
fn disabled_while_sending() {
    let mut t = PromiseTrigger::new();
    assert_eq!(t.label(), "Make a Promise");
    assert!(t.begin());
    assert_eq!(t.state(), TriggerState::Sending);
    assert_eq!(t.label(), "Sending...");
    assert!(!t.is_enabled());
    assert!(!t.begin());
}

#[test]
fn failure_reenables_and_success_locks() {
    let mut t = PromiseTrigger::new();
    t.begin();
    t.finish(DeliveryReport::default());
    assert_eq!(t.state(), TriggerState::Failed);
    assert_eq!(t.label(), "Error - Try again");
    assert!(t.is_enabled());

    t.begin();
    t.finish(DeliveryReport {
        successful: vec![crate::notify::retry::Delivered {
            recipient: "a@example.com".to_string(),
            message_id: crate::notify::mail::MessageId("m1".to_string()),
        }],
        failed: vec![],
    });
    assert_eq!(t.state(), TriggerState::Sent);
    assert!(!t.is_enabled());
    assert!(t.label().starts_with("Promise Sent!"));
}

#[tokio::test(start_paused = true)]
async fn press_sends_once_and_ignores_later_presses() {
    let transport = DryRunTransport::default();
    let mut t = PromiseTrigger::new();
    let report = t
        .press(&transport, &letter(), &RetryPolicy::default())
        .await
        .cloned()
        .unwrap();
    assert_eq!(report.successful.len(), 2);
    assert_eq!(transport.attempts(), 2);

    assert!(
        t.press(&transport, &letter(), &RetryPolicy::default())
            .await
            .is_none()
    );
    assert_eq!(transport.attempts(), 2);
}
