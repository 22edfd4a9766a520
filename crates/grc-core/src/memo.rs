use std::collections::HashMap;

use serde::Serialize;

use crate::error::ErrorKind;

/// Checks whose outcome is remembered for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoKey {
    Installation,
    Version,
    Authentication,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum CachedOutcome {
    #[default]
    Unknown,
    Passed,
    Failed(ErrorKind),
}

#[derive(Debug, Clone, Default)]
struct Entry {
    outcome: CachedOutcome,
    dirty: bool,
}

/// Per-session memo of gate outcomes.
///
/// Entries never expire. `invalidate` marks an entry dirty so the next `get`
/// reports `Unknown`; the previous outcome stays readable through
/// `last_known` until it is overwritten.
#[derive(Debug, Clone, Default)]
pub struct SessionMemo {
    entries: HashMap<MemoKey, Entry>,
}

impl SessionMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: MemoKey) -> CachedOutcome {
        match self.entries.get(&key) {
            Some(entry) if !entry.dirty => entry.outcome.clone(),
            _ => CachedOutcome::Unknown,
        }
    }

    pub fn set(&mut self, key: MemoKey, outcome: CachedOutcome) {
        self.entries.insert(
            key,
            Entry {
                outcome,
                dirty: false,
            },
        );
    }

    pub fn invalidate(&mut self, key: MemoKey) {
        if let Some(entry) = self.entries.get_mut(&key) {
            tracing::debug!(?key, "memo invalidated");
            entry.dirty = true;
        }
    }

    pub fn invalidate_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.dirty = true;
        }
    }

    pub fn last_known(&self, key: MemoKey) -> CachedOutcome {
        self.entries
            .get(&key)
            .map(|e| e.outcome.clone())
            .unwrap_or_default()
    }
}
