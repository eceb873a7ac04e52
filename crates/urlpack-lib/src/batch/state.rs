use std::fmt;

/// Lifecycle of one batch run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Processing,
    Archiving,
    Complete,
    Error,
}

impl BatchState {
    pub fn can_transition_to(self, next: BatchState) -> bool {
        use BatchState::*;
        matches!(
            (self, next),
            (Idle, Processing)
                | (Processing, Archiving)
                | (Processing, Error)
                | (Archiving, Complete)
                | (Archiving, Error)
        )
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchState::Idle => "idle",
            BatchState::Processing => "processing",
            BatchState::Archiving => "archiving",
            BatchState::Complete => "complete",
            BatchState::Error => "error",
        };
        f.write_str(name)
    }
}

/// Tracks the current state of a run and logs each transition.
#[derive(Debug)]
pub(crate) struct StateMachine {
    state: BatchState,
}

impl StateMachine {
    pub(crate) fn new() -> Self {
        Self {
            state: BatchState::Idle,
        }
    }

    pub(crate) fn state(&self) -> BatchState {
        self.state
    }

    pub(crate) fn advance(&mut self, next: BatchState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid batch transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "Batch state changed");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut machine = StateMachine::new();

        for next in [BatchState::Processing, BatchState::Archiving, BatchState::Complete] {
            machine.advance(next);
        }

        assert_eq!(machine.state(), BatchState::Complete);
    }

    #[test]
    fn test_archiving_only_after_processing() {
        assert!(!BatchState::Idle.can_transition_to(BatchState::Archiving));
        assert!(!BatchState::Idle.can_transition_to(BatchState::Complete));
        assert!(!BatchState::Processing.can_transition_to(BatchState::Complete));
        assert!(BatchState::Processing.can_transition_to(BatchState::Error));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for next in [
            BatchState::Idle,
            BatchState::Processing,
            BatchState::Archiving,
            BatchState::Complete,
            BatchState::Error,
        ] {
            assert!(!BatchState::Complete.can_transition_to(next));
            assert!(!BatchState::Error.can_transition_to(next));
        }
    }
}
