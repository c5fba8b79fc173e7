//! Pinned competitors as explicit session state.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PinError {
    #[error("you can pin up to {limit} competitors")]
    LimitReached { limit: usize },

    #[error("competitor id must be non-empty")]
    EmptyId,
}

/// What a [`PinSet::toggle`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Pinned,
    Unpinned,
}

/// Ordered, deduplicated, bounded set of pinned competitor ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinSet {
    ids: Vec<String>,
    #[serde(skip)]
    limit: usize,
}

impl PinSet {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            ids: Vec::new(),
            limit,
        }
    }

    /// Build from stored ids, keeping the first `limit` distinct non-empty ones.
    #[must_use]
    pub fn from_ids<I, S>(ids: I, limit: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new(limit);
        for id in ids {
            let id = id.as_ref().trim();
            if id.is_empty() || set.contains(id) {
                continue;
            }
            if set.is_full() {
                break;
            }
            set.ids.push(id.to_string());
        }
        set
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|pinned| pinned == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.ids.len() >= self.limit
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Unpin `id` if pinned, otherwise pin it.
    ///
    /// # Errors
    ///
    /// Returns [`PinError::EmptyId`] for a blank id and
    /// [`PinError::LimitReached`] when pinning into a full set. The set is
    /// unchanged on error.
    pub fn toggle(&mut self, id: &str) -> Result<Toggle, PinError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(PinError::EmptyId);
        }
        if let Some(pos) = self.ids.iter().position(|pinned| pinned == id) {
            self.ids.remove(pos);
            return Ok(Toggle::Unpinned);
        }
        if self.is_full() {
            return Err(PinError::LimitReached { limit: self.limit });
        }
        self.ids.push(id.to_string());
        Ok(Toggle::Pinned)
    }

    /// Pin every id not already pinned, stopping when the set is full.
    ///
    /// Returns how many ids were added.
    pub fn pin_all<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for id in ids {
            let id = id.as_ref().trim();
            if id.is_empty() || self.contains(id) {
                continue;
            }
            if self.is_full() {
                tracing::warn!(limit = self.limit, "pin limit reached, skipping remaining ids");
                break;
            }
            self.ids.push(id.to_string());
            added += 1;
        }
        added
    }
}
