//! Session playback state machine.
//!
//! ```text
//! Idle --start--> Running --advance--> Running ... --advance--> Complete --finish--> Idle
//!                    \--exit--> Idle
//! ```
//!
//! The engine does not own a clock. Entering a step that carries a duration
//! arms a countdown tagged with a fresh [`TimerId`]; the host delivers
//! one-second ticks with that id. Ticks for any other id are stale and are
//! discarded, so a countdown never carries over to another step.

use crate::{Error, Result, Session, Step};

/// Identifies one armed countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Remaining time of the active step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    pub id: TimerId,
    pub remaining_sec: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Running {
        step_index: usize,
        countdown: Option<Countdown>,
    },
    Complete,
}

/// Outcome of an `advance` call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Moved to another step; `timer` is set when that step is timed
    Step {
        step_index: usize,
        timer: Option<TimerId>,
    },
    /// Moved past the last step
    Finished,
}

#[derive(Clone, Debug)]
pub struct Playback {
    session: Session,
    state: PlaybackState,
    next_timer: u64,
}

impl Playback {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            state: PlaybackState::Idle,
            next_timer: 0,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, PlaybackState::Running { .. })
    }

    pub fn step_index(&self) -> Option<usize> {
        match self.state {
            PlaybackState::Running { step_index, .. } => Some(step_index),
            _ => None,
        }
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.step_index().and_then(|i| self.session.steps.get(i))
    }

    pub fn countdown(&self) -> Option<Countdown> {
        match self.state {
            PlaybackState::Running { countdown, .. } => countdown,
            _ => None,
        }
    }

    pub fn remaining_sec(&self) -> Option<u32> {
        self.countdown().map(|c| c.remaining_sec)
    }

    pub fn is_last_step(&self) -> bool {
        self.step_index()
            .is_some_and(|i| i + 1 >= self.session.steps.len())
    }

    /// Fraction of steps reached, counting the active one: `(index + 1) / count`.
    pub fn progress(&self) -> f64 {
        let count = self.session.steps.len();
        match self.state {
            PlaybackState::Running { step_index, .. } if count > 0 => {
                (step_index + 1) as f64 / count as f64
            }
            PlaybackState::Complete => 1.0,
            _ => 0.0,
        }
    }

    /// Label for the advance action on the active step.
    pub fn advance_label(&self) -> &'static str {
        if self.is_last_step() {
            "Finish"
        } else {
            "Next"
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Start at the first step.
    pub fn start(&mut self) -> Result<Option<TimerId>> {
        match self.state {
            PlaybackState::Running { .. } => {
                Err(Error::Playback("playback already running".into()))
            }
            _ if self.session.steps.is_empty() => {
                Err(Error::Playback(format!("session {:?} has no steps", self.session.title)))
            }
            _ => {
                tracing::debug!("Starting playback of {:?}", self.session.title);
                Ok(self.enter_step(0))
            }
        }
    }

    /// Move to the next step, or to `Complete` after the last one.
    pub fn advance(&mut self) -> Result<Advance> {
        let PlaybackState::Running { step_index, .. } = self.state else {
            return Err(Error::Playback("playback is not running".into()));
        };

        let next = step_index + 1;
        if next >= self.session.steps.len() {
            self.state = PlaybackState::Complete;
            tracing::debug!("Playback of {:?} complete", self.session.title);
            return Ok(Advance::Finished);
        }

        let timer = self.enter_step(next);
        Ok(Advance::Step {
            step_index: next,
            timer,
        })
    }

    /// Abandon playback. Nothing is recorded.
    pub fn exit(&mut self) {
        if self.is_running() {
            tracing::debug!("Exited playback of {:?}", self.session.title);
        }
        self.state = PlaybackState::Idle;
    }

    /// Leave the `Complete` state.
    pub fn finish(&mut self) {
        if self.state == PlaybackState::Complete {
            self.state = PlaybackState::Idle;
        }
    }

    /// Apply a one-second tick.
    ///
    /// Returns the new remaining seconds, or `None` when `id` is not the
    /// current countdown. Stops at zero and never advances the step.
    pub fn tick(&mut self, id: TimerId) -> Option<u32> {
        match &mut self.state {
            PlaybackState::Running {
                countdown: Some(countdown),
                ..
            } if countdown.id == id => {
                countdown.remaining_sec = countdown.remaining_sec.saturating_sub(1);
                Some(countdown.remaining_sec)
            }
            _ => {
                tracing::trace!("Discarding stale tick {:?}", id);
                None
            }
        }
    }

    fn enter_step(&mut self, step_index: usize) -> Option<TimerId> {
        let countdown = self.session.steps[step_index]
            .duration_sec()
            .map(|secs| Countdown {
                id: self.fresh_timer(),
                remaining_sec: secs,
            });

        self.state = PlaybackState::Running {
            step_index,
            countdown,
        };
        countdown.map(|c| c.id)
    }

    fn fresh_timer(&mut self) -> TimerId {
        self.next_timer += 1;
        TimerId(self.next_timer)
    }
}
