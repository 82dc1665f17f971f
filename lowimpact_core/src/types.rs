//! Core domain types for the low impact trainer.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise categories and the daily rotation
//! - Difficulty levels and their linear scaling
//! - Steps and generated sessions
//! - The persisted progress triple

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whole days elapsed since the Unix epoch (UTC).
pub type DayIndex = i64;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Day index for a point in time.
pub fn day_index(now: DateTime<Utc>) -> DayIndex {
    now.timestamp_millis().div_euclid(MILLIS_PER_DAY)
}

/// Day index for the current wall-clock time.
pub fn today() -> DayIndex {
    day_index(Utc::now())
}

// ============================================================================
// Categories
// ============================================================================

/// Low impact exercise category
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TaiChi,
    ChairYoga,
    Walking,
    Balance,
    Mobility,
    Core,
    Restorative,
}

impl Category {
    /// Daily rotation order, indexed by `day mod 7`.
    pub const ROTATION: [Category; 7] = [
        Category::TaiChi,
        Category::ChairYoga,
        Category::Walking,
        Category::Balance,
        Category::Mobility,
        Category::Core,
        Category::Restorative,
    ];

    /// Category scheduled for the given day.
    ///
    /// Uses a non-negative modulo so days before the epoch still map into the rotation.
    pub fn for_day(day: DayIndex) -> Category {
        let len = Self::ROTATION.len() as i64;
        Self::ROTATION[day.rem_euclid(len) as usize]
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::TaiChi => "Tai Chi",
            Category::ChairYoga => "Chair Yoga",
            Category::Walking => "Walking",
            Category::Balance => "Balance",
            Category::Mobility => "Mobility",
            Category::Core => "Core (Gentle)",
            Category::Restorative => "Restorative",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Category::TaiChi => "Slow forms for balance & flow",
            Category::ChairYoga => "Gentle mobility with support",
            Category::Walking => "Steady pace, mindful breath",
            Category::Balance => "Stability & ankle strength",
            Category::Mobility => "Hips/shoulders, pain-free range",
            Category::Core => "Deep core activation",
            Category::Restorative => "Breathwork & recovery",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    /// Accepts snake_case, kebab-case or space separated names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();

        match normalized.as_str() {
            "tai_chi" | "taichi" => Ok(Category::TaiChi),
            "chair_yoga" => Ok(Category::ChairYoga),
            "walking" | "walk" => Ok(Category::Walking),
            "balance" => Ok(Category::Balance),
            "mobility" => Ok(Category::Mobility),
            "core" => Ok(Category::Core),
            "restorative" => Ok(Category::Restorative),
            _ => Err(crate::Error::Other(format!("Unknown category: {}", s))),
        }
    }
}

// ============================================================================
// Difficulty level
// ============================================================================

/// Difficulty level, always within `[Level::MIN, Level::MAX]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", from = "i64")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(5);

    /// Build a level, silently clamping out-of-range input.
    pub fn clamped(value: i64) -> Self {
        Level(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_max(self) -> bool {
        self >= Self::MAX
    }

    /// Linear scaling: `base + (level - 1) * 2`.
    pub fn scale(self, base: u32) -> u32 {
        base + (self.0 as u32 - 1) * 2
    }

    /// Move by `delta` steps, clamped to the valid range.
    pub fn adjust(self, delta: i64) -> Self {
        Self::clamped((self.0 as i64).saturating_add(delta))
    }

    /// Next level up, capped at `Level::MAX`.
    pub fn raise(self) -> Self {
        self.adjust(1)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::MIN
    }
}

impl From<i64> for Level {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Steps and sessions
// ============================================================================

/// What a step asks of the user. A step is timed, counted, or a plain instruction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepTarget {
    /// Hold or perform for this many seconds
    Duration(u32),
    /// Perform this many repetitions, self-paced
    Reps(u32),
    /// No numeric target
    Instruction,
}

impl fmt::Display for StepTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepTarget::Duration(secs) => write!(f, "{}m {}s", secs / 60, secs % 60),
            StepTarget::Reps(n) => write!(f, "x{}", n),
            StepTarget::Instruction => Ok(()),
        }
    }
}

/// A single exercise step within a session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    pub name: String,
    pub target: StepTarget,
}

impl Step {
    pub fn timed(name: impl Into<String>, secs: u32) -> Self {
        Self {
            name: name.into(),
            target: StepTarget::Duration(secs),
        }
    }

    pub fn reps(name: impl Into<String>, reps: u32) -> Self {
        Self {
            name: name.into(),
            target: StepTarget::Reps(reps),
        }
    }

    pub fn instruction(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: StepTarget::Instruction,
        }
    }

    pub fn duration_sec(&self) -> Option<u32> {
        match self.target {
            StepTarget::Duration(secs) => Some(secs),
            _ => None,
        }
    }

    pub fn rep_count(&self) -> Option<u32> {
        match self.target {
            StepTarget::Reps(n) => Some(n),
            _ => None,
        }
    }
}

/// A fully parameterized workout, regenerated for every (category, level) request
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub title: String,
    /// Displayed estimate; not reconciled with the step durations.
    pub total_minutes: u32,
    pub steps: Vec<Step>,
}

// ============================================================================
// Progress
// ============================================================================

/// The only durable state: difficulty, streak and the day of the last completion or skip
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProgressState {
    pub level: Level,
    pub streak: u32,
    pub last_completed_day: Option<DayIndex>,
}

impl ProgressState {
    /// True when today's session was already completed or skipped.
    pub fn completed_today(&self, today: DayIndex) -> bool {
        self.last_completed_day == Some(today)
    }

    /// Human readable streak, e.g. "1 day" or "3 days".
    pub fn streak_label(&self) -> String {
        if self.streak == 1 {
            "1 day".to_string()
        } else {
            format!("{} days", self.streak)
        }
    }
}
