use crate::notify::{
    mail::{MailTransport, PromiseLetter},
    retry::{DeliveryReport, RetryPolicy, deliver_promise},
};

/// State of the "make a promise" control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerState {
    /// Ready to send.
    #[default]
    Idle,
    /// A request is in flight.
    Sending,
    /// At least one mail went out. Stays disabled.
    Sent,
    /// Nothing went out; pressing again retries.
    Failed,
}

/// UI model of the control that sends the promise letter.
///
/// Independent of journey progress: a failed send never touches journey state.
#[derive(Clone, Debug, Default)]
pub struct PromiseTrigger {
    state: TriggerState,
    last_report: Option<DeliveryReport>,
}

impl PromiseTrigger {
    /// Idle control.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Whether the control accepts presses.
    pub fn is_enabled(&self) -> bool {
        matches!(self.state, TriggerState::Idle | TriggerState::Failed)
    }

    /// Button text.
    pub fn label(&self) -> &'static str {
        match self.state {
            TriggerState::Idle => "Make a Promise",
            TriggerState::Sending => "Sending...",
            TriggerState::Sent => "Promise Sent! 💕",
            TriggerState::Failed => "Error - Try again",
        }
    }

    /// Report of the most recent completed press.
    pub fn last_report(&self) -> Option<&DeliveryReport> {
        self.last_report.as_ref()
    }

    /// Enter `Sending`. `false` if the control is disabled.
    pub fn begin(&mut self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.state = TriggerState::Sending;
        true
    }

    /// Leave `Sending` according to `report`.
    pub fn finish(&mut self, report: DeliveryReport) {
        self.state = if report.is_success() {
            TriggerState::Sent
        } else {
            TriggerState::Failed
        };
        self.last_report = Some(report);
    }

    /// Press the control: send the letter and settle on the outcome.
    ///
    /// Returns `None` when the press was ignored because the control was disabled.
    pub async fn press<T: MailTransport + ?Sized>(
        &mut self,
        transport: &T,
        letter: &PromiseLetter,
        policy: &RetryPolicy,
    ) -> Option<&DeliveryReport> {
        if !self.begin() {
            return None;
        }
        let report = deliver_promise(transport, letter, policy).await;
        self.finish(report);
        self.last_report.as_ref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/notify/trigger.rs"]
mod tests;
