//! One-shot completion signal bound to the terminal segment of a timeline.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TokenState {
    Pending,
    Fired,
    /// Teardown happened before completion; the callback was dropped unrun.
    Suppressed,
}

/// Holds the caller's completion callback until it is fired or suppressed.
///
/// The callback is an `FnOnce` taken out of the token on first use, so a
/// second `fire` can never reach it.
pub struct CompletionToken {
    callback: Option<Box<dyn FnOnce()>>,
    state: TokenState,
}

impl CompletionToken {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
            state: TokenState::Pending,
        }
    }

    /// Token without a callback; firing only records the state change.
    pub fn unbound() -> Self {
        Self {
            callback: None,
            state: TokenState::Pending,
        }
    }

    pub fn state(&self) -> TokenState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == TokenState::Pending
    }

    /// Run the callback. Returns `false` (and does nothing) unless pending.
    pub fn fire(&mut self) -> bool {
        if self.state != TokenState::Pending {
            return false;
        }
        self.state = TokenState::Fired;
        if let Some(cb) = self.callback.take() {
            cb();
        }
        true
    }

    /// Drop the callback without running it. Returns `false` unless pending.
    pub fn suppress(&mut self) -> bool {
        if self.state != TokenState::Pending {
            return false;
        }
        self.state = TokenState::Suppressed;
        self.callback = None;
        true
    }
}

impl Default for CompletionToken {
    fn default() -> Self {
        Self::unbound()
    }
}

impl fmt::Debug for CompletionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionToken")
            .field("state", &self.state)
            .field("bound", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn fires_exactly_once() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let mut token = CompletionToken::new(move || c.set(c.get() + 1));
        assert!(token.fire());
        assert!(!token.fire());
        assert!(!token.suppress());
        assert_eq!(count.get(), 1);
        assert_eq!(token.state(), TokenState::Fired);
    }

    #[test]
    fn suppressed_token_never_fires() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let mut token = CompletionToken::new(move || c.set(c.get() + 1));
        assert!(token.suppress());
        assert!(!token.fire());
        assert_eq!(count.get(), 0);
        assert_eq!(token.state(), TokenState::Suppressed);
    }
}
