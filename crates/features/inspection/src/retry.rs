//! Retry count and bypass gate for the part being inspected.

use serde::{Deserialize, Serialize};
use vaudit_kernel::domain::{ComponentId, Domain};

/// Identifies one part of one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartCursor {
    pub domain: Domain,
    pub component: ComponentId,
    pub part: usize,
}

/// What the capture screen offers after a failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPrompt {
    Retake,
    RetakeOrBypass,
}

/// Persisted so it survives a round trip to the verification screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryState {
    /// Consecutive failed attempts on `cursor`.
    pub count: u32,
    pub cursor: Option<PartCursor>,
    pub bypass_offered: bool,
    pub wrong_pins: u32,
}

impl RetryState {
    #[must_use]
    pub fn is_on(&self, cursor: &PartCursor) -> bool {
        self.cursor.as_ref() == Some(cursor)
    }

    /// Registers a failed attempt and returns the prompt to show.
    pub fn register_failure(&mut self, cursor: PartCursor) -> RetryPrompt {
        if !self.is_on(&cursor) {
            *self = Self { cursor: Some(cursor), ..Self::default() };
        }
        let prompt = if self.count == 0 {
            RetryPrompt::Retake
        } else {
            self.bypass_offered = true;
            RetryPrompt::RetakeOrBypass
        };
        self.count += 1;
        prompt
    }

    #[must_use]
    pub fn bypass_offered_for(&self, cursor: &PartCursor) -> bool {
        self.bypass_offered && self.is_on(cursor)
    }

    /// Whether `max_attempts` wrong PINs have been entered for `cursor`.
    #[must_use]
    pub fn is_locked(&self, cursor: &PartCursor, max_attempts: Option<u32>) -> bool {
        max_attempts.is_some_and(|max| self.is_on(cursor) && self.wrong_pins >= max)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
