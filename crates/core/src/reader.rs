//! Reader state: the current position in the proposition list and the
//! jump-list overlay flag, with clamped navigation and the substring filter.
//!
//! This is the model half of the reading view; rendering lives in the CLI's
//! TUI. Every operation is a synchronous state update.

use crate::corpus::Proposition;

#[derive(Debug, Clone)]
pub struct ReaderState {
    index: usize,
    len: usize,
    overlay_open: bool,
}

impl ReaderState {
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len,
            overlay_open: false,
        }
    }

    /// Start at `index`, clamped into bounds.
    pub fn with_index(len: usize, index: usize) -> Self {
        let mut state = Self::new(len);
        state.index = index.min(len.saturating_sub(1));
        state
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Step forward. No-op at the last proposition; no wraparound.
    pub fn next(&mut self) {
        if self.index + 1 < self.len {
            self.index += 1;
        }
    }

    /// Step backward. No-op at the first proposition; no wraparound.
    pub fn prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn first(&mut self) {
        self.index = 0;
    }

    pub fn last(&mut self) {
        self.index = self.len.saturating_sub(1);
    }

    /// Jump to an arbitrary index. Out-of-range jumps are ignored.
    pub fn jump(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay_open
    }

    pub fn open_overlay(&mut self) {
        self.overlay_open = true;
    }

    pub fn close_overlay(&mut self) {
        self.overlay_open = false;
    }
}

/// Indices of propositions matching `term`, in original order.
///
/// A proposition matches when its number contains the term as typed, or its
/// text contains the term case-insensitively. The empty term matches
/// everything.
pub fn filter_indices(propositions: &[Proposition], term: &str) -> Vec<usize> {
    if term.is_empty() {
        return (0..propositions.len()).collect();
    }
    let lowered = term.to_lowercase();
    propositions
        .iter()
        .enumerate()
        .filter(|(_, p)| p.number.contains(term) || p.text.to_lowercase().contains(&lowered))
        .map(|(i, _)| i)
        .collect()
}
