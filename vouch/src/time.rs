// Copyright (c) 2026 Vouch Foundation

use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}

/// Slot containing `secs`.
pub fn slot_of(secs: u64, slot_length: u64) -> u64 {
    secs / slot_length
}

pub fn current_slot(slot_length: u64) -> u64 {
    slot_of(now_secs(), slot_length)
}
