/*!
 * Trap Results
 * Outcomes of trap handling and the dispatcher state machine
 */

use super::exception::ExceptionType;
use crate::core::types::Word;
use crate::marshal::MarshalError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why the machine stopped
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "details")]
pub enum HaltReason {
    #[error("shutdown requested by user program")]
    UserHalt,

    #[error("unexpected system call {0}")]
    UnknownSyscall(Word),

    #[error("unhandled {0} exception")]
    Exception(ExceptionType),

    #[error("string length {requested} exceeds the read limit")]
    StringTooLong { requested: Word },

    #[error("user memory access failed: {0}")]
    MemoryFault(MarshalError),

    #[error("machine already halted")]
    AlreadyHalted,
}

/// Return type of every syscall handler
///
/// `Ok` resumes the user program; `Err` halts the machine.
pub type HandlerResult = Result<(), HaltReason>;

/// Result of delivering one trap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "details")]
pub enum TrapOutcome {
    /// Syscall handled; PC advanced to the next instruction
    Resumed,
    /// Informational trap; nothing to resume
    Returned,
    /// Machine halted; PC untouched
    Halted(HaltReason),
}

impl TrapOutcome {
    #[inline]
    pub const fn is_halted(&self) -> bool {
        matches!(self, Self::Halted(_))
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Resumed => "resumed",
            Self::Returned => "returned",
            Self::Halted(_) => "halted",
        }
    }
}

/// Dispatcher lifecycle for one execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchState {
    #[default]
    Idle,
    Dispatching,
    Handling,
    Resuming,
    /// Terminal until the kernel is reset
    Halted,
}

impl DispatchState {
    /// Whether `self -> next` is a legal transition
    pub const fn can_transition_to(self, next: DispatchState) -> bool {
        use DispatchState::*;
        matches!(
            (self, next),
            (Idle, Dispatching)
                | (Dispatching, Handling)
                | (Dispatching, Idle)
                | (Handling, Resuming)
                | (Resuming, Idle)
                | (Dispatching, Halted)
                | (Handling, Halted)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use DispatchState::*;
        assert!(Idle.can_transition_to(Dispatching));
        assert!(Handling.can_transition_to(Resuming));
        assert!(Handling.can_transition_to(Halted));
        assert!(!Halted.can_transition_to(Idle));
        assert!(!Resuming.can_transition_to(Halted));
        assert!(!Idle.can_transition_to(Handling));
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = TrapOutcome::Halted(HaltReason::UnknownSyscall(99));
        let json = serde_json::to_string(&outcome).unwrap();
        let back: TrapOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(outcome, back);
        assert!(back.is_halted());
        assert_eq!(TrapOutcome::Resumed.label(), "resumed");
    }
}
