// SPDX-License-Identifier: GPL-3.0-only

//! Press feedback countdowns.
//!
//! A fired key is filled with the flash color for a few ticks. Counters are
//! keyed by label so every copy of a duplicated key (both SHIFTs) flashes.

use std::collections::HashMap;

/// Remaining flash ticks per key label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashCounters {
    remaining: HashMap<String, u8>,
}

impl FlashCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts or restarts the flash of `label`.
    pub fn trigger(&mut self, label: &str, ticks: u8) {
        if ticks == 0 {
            self.remaining.remove(label);
        } else {
            self.remaining.insert(label.to_string(), ticks);
        }
    }

    /// Advances every countdown by one tick.
    pub fn tick(&mut self) {
        self.remaining.retain(|_, ticks| {
            *ticks = ticks.saturating_sub(1);
            *ticks > 0
        });
    }

    #[must_use]
    pub fn is_flashing(&self, label: &str) -> bool {
        self.remaining.get(label).is_some_and(|&ticks| ticks > 0)
    }

    #[must_use]
    pub fn remaining(&self, label: &str) -> u8 {
        self.remaining.get(label).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: a flash lasts exactly its tick count
    #[test]
    fn test_flash_lasts_tick_count() {
        let mut flashes = FlashCounters::new();
        flashes.trigger("A", 5);

        let mut visible = 0;
        while flashes.is_flashing("A") {
            visible += 1;
            flashes.tick();
        }
        assert_eq!(visible, 5, "Flash should be visible for five ticks");
        assert!(flashes.is_empty(), "Expired counters are dropped");
    }

    /// Test: retriggering restarts the countdown
    #[test]
    fn test_retrigger_restarts() {
        let mut flashes = FlashCounters::new();
        flashes.trigger("A", 5);
        flashes.tick();
        flashes.tick();
        assert_eq!(flashes.remaining("A"), 3);

        flashes.trigger("A", 5);
        assert_eq!(flashes.remaining("A"), 5);
    }

    /// Test: counters are independent per label
    #[test]
    fn test_independent_labels() {
        let mut flashes = FlashCounters::new();
        flashes.trigger("A", 1);
        flashes.trigger("B", 3);
        flashes.tick();

        assert!(!flashes.is_flashing("A"));
        assert!(flashes.is_flashing("B"));
        assert!(!flashes.is_flashing("C"));

        flashes.trigger("B", 0);
        assert!(!flashes.is_flashing("B"), "Zero ticks cancels the flash");
    }
}
