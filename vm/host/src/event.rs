// Copyright (c) 2026 Vouch Foundation

use serde::{Deserialize, Serialize};

/// Who produced a receipt record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptKind {
    /// Written by the host itself, e.g. one per call made with a receipt
    SystemDefined,
    /// Written by contract code
    UserDefined,
}

/// One entry of a transaction's receipt log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub kind: ReceiptKind,
    pub content: String,
}

/// A published event, not part of consensus data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub topic: String,
    pub data: String,
}

/// Collects receipts and events emitted during execution.
#[derive(Debug, Default)]
pub struct EventPoster {
    receipts: Vec<Receipt>,
    events: Vec<Event>,
}

impl EventPoster {
    pub fn receipt(&mut self, kind: ReceiptKind, content: String) {
        self.receipts.push(Receipt { kind, content });
    }

    pub fn post_event(&mut self, topic: &str, data: String) {
        self.events.push(Event {
            topic: topic.to_string(),
            data,
        });
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Drain the receipt log, e.g. at the end of a transaction.
    pub fn take_receipts(&mut self) -> Vec<Receipt> {
        std::mem::take(&mut self.receipts)
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
