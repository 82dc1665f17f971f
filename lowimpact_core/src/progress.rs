//! Streak and difficulty progression.
//!
//! The tracker holds the progress triple in memory and mirrors every change
//! to a [`KeyValueStore`]. Writes are fire-and-forget: in-memory state is
//! updated first and a failed write is only logged.

use crate::store::KeyValueStore;
use crate::{DayIndex, Error, Level, ProgressState, Result};
use std::fmt::Display;
use std::str::FromStr;

pub const K_LEVEL: &str = "level";
pub const K_STREAK: &str = "streak";
pub const K_LAST_DONE: &str = "last_done";

/// A level-up is granted every time the streak reaches a multiple of this.
pub const LEVEL_UP_EVERY: u32 = 7;

/// Result of recording a completed session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub state: ProgressState,
    /// True when yesterday was the last recorded day
    pub continued: bool,
    pub leveled_up: bool,
}

/// Owner of the persisted progress state
#[derive(Debug)]
pub struct ProgressTracker<S: KeyValueStore> {
    store: S,
    state: ProgressState,
}

/// Read an integer key, distinguishing absent from malformed.
fn read_int<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: KeyValueStore,
    T: FromStr,
{
    match store.get(key)? {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Parse {
                key: key.to_string(),
                value: raw,
            }),
    }
}

/// Read an integer key, falling back to `None` on any failure.
fn read_int_or_default<S, T>(store: &S, key: &str) -> Option<T>
where
    S: KeyValueStore,
    T: FromStr,
{
    match read_int(store, key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Unable to read {:?}: {}. Using default.", key, e);
            None
        }
    }
}

impl<S: KeyValueStore> ProgressTracker<S> {
    /// Load state from the store.
    ///
    /// Missing keys resolve to level 1, streak 0 and "never completed".
    /// Malformed values are logged and replaced by the same defaults.
    pub fn load(store: S) -> Self {
        let level = read_int_or_default::<S, i64>(&store, K_LEVEL)
            .map(Level::clamped)
            .unwrap_or_default();
        let streak = read_int_or_default::<S, u32>(&store, K_STREAK).unwrap_or(0);
        let last_completed_day = read_int_or_default::<S, DayIndex>(&store, K_LAST_DONE);

        let state = ProgressState {
            level,
            streak,
            last_completed_day,
        };
        tracing::debug!("Loaded progress state: {:?}", state);

        Self { store, state }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn level(&self) -> Level {
        self.state.level
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Record today's session as completed.
    ///
    /// The streak continues only if the last recorded day is exactly
    /// `today - 1`; otherwise it restarts at 1. Completing twice on the same
    /// day therefore restarts the streak on the second call.
    pub fn complete(&mut self, today: DayIndex) -> Completion {
        let continued = self
            .state
            .last_completed_day
            .is_some_and(|day| day.checked_add(1) == Some(today));

        let streak = if continued {
            self.state.streak.saturating_add(1)
        } else {
            1
        };

        let leveled_up = streak % LEVEL_UP_EVERY == 0 && !self.state.level.is_max();
        if leveled_up {
            self.state.level = self.state.level.raise();
        }
        self.state.streak = streak;
        self.state.last_completed_day = Some(today);

        if leveled_up {
            tracing::info!(
                "Streak reached {} days, level raised to {}",
                streak,
                self.state.level
            );
        } else {
            tracing::info!("Completed day {}, streak now {}", today, streak);
        }

        self.persist(K_STREAK, self.state.streak);
        self.persist(K_LEVEL, self.state.level);
        self.persist(K_LAST_DONE, today);

        Completion {
            state: self.state,
            continued,
            leveled_up,
        }
    }

    /// Skip today: the streak resets to zero, the level is untouched.
    pub fn skip(&mut self, today: DayIndex) -> &ProgressState {
        self.state.streak = 0;
        self.state.last_completed_day = Some(today);
        tracing::info!("Skipped day {}, streak reset", today);

        self.persist(K_STREAK, 0);
        self.persist(K_LAST_DONE, today);

        &self.state
    }

    /// Explicit difficulty override, clamped to the valid range.
    pub fn adjust_level(&mut self, delta: i64) -> Level {
        let level = self.state.level.adjust(delta);
        if level != self.state.level {
            tracing::info!("Level adjusted from {} to {}", self.state.level, level);
        }
        self.state.level = level;
        self.persist(K_LEVEL, level);
        level
    }

    fn persist(&mut self, key: &str, value: impl Display) {
        if let Err(e) = self.store.set(key, &value.to_string()) {
            tracing::warn!("Failed to persist {:?}: {}", key, e);
        }
    }
}
