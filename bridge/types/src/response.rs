use {
    crate::{Amount, Event, SendReceipt},
    serde::{Deserialize, Serialize},
};

/// Outcome of a successful state-changing call.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub events: Vec<Event>,
    /// Messages handed to the channel during this call.
    pub receipts: Vec<SendReceipt>,
    /// Native funds returned to the caller.
    pub refund: Amount,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn add_events<I>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = Event>,
    {
        self.events.extend(events);
        self
    }

    pub fn add_receipt(mut self, receipt: SendReceipt) -> Self {
        self.refund = self.refund.saturating_add(receipt.refund);
        self.receipts.push(receipt);
        self
    }
}
