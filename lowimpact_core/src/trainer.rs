//! Controller tying the progress tracker to session playback.
//!
//! The trainer is the single owner of both the progress state and the
//! playback state. Hosts call into it on user actions and ticks.

use crate::catalog::build_session;
use crate::playback::{Advance, Playback, TimerId};
use crate::progress::{Completion, ProgressTracker};
use crate::store::KeyValueStore;
use crate::{Category, DayIndex, Error, Level, ProgressState, Result, Session};

/// What the overview screen shows for a day
#[derive(Clone, Debug)]
pub struct Overview {
    pub category: Category,
    pub session: Session,
    pub progress: ProgressState,
    pub completed_today: bool,
}

/// Outcome of advancing an active playback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepAdvance {
    Step {
        step_index: usize,
        timer: Option<TimerId>,
    },
    /// Playback finished and the completion was recorded
    Finished(Completion),
}

#[derive(Debug)]
pub struct Trainer<S: KeyValueStore> {
    tracker: ProgressTracker<S>,
    playback: Option<Playback>,
    category_override: Option<Category>,
}

impl<S: KeyValueStore> Trainer<S> {
    pub fn new(tracker: ProgressTracker<S>) -> Self {
        Self {
            tracker,
            playback: None,
            category_override: None,
        }
    }

    /// Pin the category instead of following the daily rotation.
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category_override = category;
        self
    }

    pub fn progress(&self) -> &ProgressState {
        self.tracker.state()
    }

    pub fn playback(&self) -> Option<&Playback> {
        self.playback.as_ref()
    }

    pub fn category_for(&self, today: DayIndex) -> Category {
        self.category_override
            .unwrap_or_else(|| Category::for_day(today))
    }

    /// Today's session at the current level.
    pub fn session_for(&self, today: DayIndex) -> Session {
        build_session(self.category_for(today), self.tracker.level())
    }

    pub fn overview(&self, today: DayIndex) -> Overview {
        let progress = *self.tracker.state();
        Overview {
            category: self.category_for(today),
            session: self.session_for(today),
            progress,
            completed_today: progress.completed_today(today),
        }
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Begin playing today's session from its first step.
    pub fn start(&mut self, today: DayIndex) -> Result<Option<TimerId>> {
        if self.playback.as_ref().is_some_and(Playback::is_running) {
            return Err(Error::Playback("a session is already playing".into()));
        }

        let mut playback = Playback::new(self.session_for(today));
        let timer = playback.start()?;
        tracing::info!(
            "Started {:?} at level {}",
            playback.session().title,
            self.tracker.level()
        );
        self.playback = Some(playback);
        Ok(timer)
    }

    /// Advance the active playback; finishing records today's completion.
    pub fn advance(&mut self, today: DayIndex) -> Result<StepAdvance> {
        let playback = self
            .playback
            .as_mut()
            .ok_or_else(|| Error::Playback("no session is playing".into()))?;

        match playback.advance()? {
            Advance::Step { step_index, timer } => Ok(StepAdvance::Step { step_index, timer }),
            Advance::Finished => {
                playback.finish();
                self.playback = None;
                Ok(StepAdvance::Finished(self.tracker.complete(today)))
            }
        }
    }

    /// Abandon the active playback without recording anything.
    pub fn exit(&mut self) {
        if let Some(mut playback) = self.playback.take() {
            playback.exit();
            tracing::info!("Abandoned {:?}", playback.session().title);
        }
    }

    pub fn tick(&mut self, timer: TimerId) -> Option<u32> {
        self.playback.as_mut().and_then(|p| p.tick(timer))
    }

    // ========================================================================
    // Progress
    // ========================================================================

    pub fn complete(&mut self, today: DayIndex) -> Completion {
        self.tracker.complete(today)
    }

    pub fn skip(&mut self, today: DayIndex) -> ProgressState {
        *self.tracker.skip(today)
    }

    pub fn easier(&mut self) -> Level {
        self.tracker.adjust_level(-1)
    }

    pub fn harder(&mut self) -> Level {
        self.tracker.adjust_level(1)
    }
}
