//! The "promise" letter collaborator.
//!
//! Independent of journey progress. One mail per recipient is sent concurrently with bounded
//! exponential-backoff retries; partial failure is reported, not raised.

mod mail;
mod retry;
mod trigger;

pub use mail::{
    DryRunTransport, MailTransport, MessageId, OutgoingMail, PromiseLetter, Sender,
    TransportError,
};
pub use retry::{
    Delivered, DeliveryReport, RetryPolicy, Undelivered, deliver_promise, send_with_retry,
};
pub use trigger::{PromiseTrigger, TriggerState};
