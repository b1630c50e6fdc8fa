//! Bot lifecycle state machine
//!
//! Exit notifications are turned into transitions by a pure function so the
//! restart policy can be tested without spawning processes.

use std::fmt;
use std::process::ExitStatus;

use shared::LifecycleState;

/// How a bot's OS process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exited with a status code
    Code(i32),
    /// Killed by a signal (the number is unknown on some platforms)
    Signal(Option<i32>),
    /// The OS refused to start the process
    SpawnFailed,
}

impl ExitOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExitOutcome::Code(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            ExitOutcome::Signal(status.signal())
        }

        #[cfg(not(unix))]
        {
            ExitOutcome::Signal(None)
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, ExitOutcome::Code(0))
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Code(code) => write!(f, "exit code {code}"),
            ExitOutcome::Signal(Some(signal)) => write!(f, "signal {signal}"),
            ExitOutcome::Signal(None) => write!(f, "signal"),
            ExitOutcome::SpawnFailed => write!(f, "spawn failure"),
        }
    }
}

/// Side effect the supervisor must perform after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Arm the fixed-delay restart timer
    ScheduleRestart,
    /// Drop the bot from the process table
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: LifecycleState,
    pub effect: Effect,
}

/// Transition taken when a bot's process ends
///
/// Crashes and spawn failures restart forever; a clean exit or any exit
/// during supervisor shutdown removes the bot.
pub fn on_exit(current: LifecycleState, outcome: ExitOutcome, shutting_down: bool) -> Transition {
    if shutting_down || current == LifecycleState::Terminated || outcome.is_clean() {
        return Transition {
            next: LifecycleState::Terminated,
            effect: Effect::Remove,
        };
    }

    let next = match outcome {
        ExitOutcome::SpawnFailed => LifecycleState::Errored,
        _ => LifecycleState::Restarting,
    };

    Transition {
        next,
        effect: Effect::ScheduleRestart,
    }
}
