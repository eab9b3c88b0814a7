//! One-shot completion signal for host animations.
//!
//! A fade hands its [`Completer`] to the host and keeps the matching
//! [`Completion`]. The host resolves it with `true` when the animation ran to
//! its end and `false` when it was interrupted. A completer dropped without
//! being resolved counts as interrupted.
//!
//! Everything here lives on the presentation thread, hence `Rc`.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionState {
    #[default]
    Pending,
    Resolved {
        /// Whether the animation ran to its end
        completed: bool,
    },
}

impl CompletionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, CompletionState::Pending)
    }
}

/// Observing end
#[derive(Debug, Clone)]
pub struct Completion {
    state: Rc<Cell<CompletionState>>,
}

impl Completion {
    #[inline]
    pub fn state(&self) -> CompletionState {
        self.state.get()
    }
}

/// Resolving end, owned by the host
#[derive(Debug)]
pub struct Completer {
    state: Rc<Cell<CompletionState>>,
}

impl Completer {
    /// Resolve the completion. Only the first resolution sticks.
    pub fn resolve(self, completed: bool) {
        self.settle(completed);
    }

    fn settle(&self, completed: bool) {
        if self.state.get().is_pending() {
            self.state.set(CompletionState::Resolved { completed });
        }
    }
}

impl Drop for Completer {
    fn drop(&mut self) {
        self.settle(false);
    }
}

/// Create a linked completer/completion pair
pub fn completion_pair() -> (Completer, Completion) {
    let state = Rc::new(Cell::new(CompletionState::Pending));
    (
        Completer {
            state: Rc::clone(&state),
        },
        Completion { state },
    )
}
