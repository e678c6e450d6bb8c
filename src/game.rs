use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Smallest allowed distance between `minNumber` and `maxNumber`.
pub const MIN_SPAN: i64 = 10;
/// Points awarded when the guess equals the drawn number.
pub const EXACT_WIN_POINTS: u32 = 5;
/// Points awarded when the drawn number falls inside the neighbor window.
pub const NEIGHBOR_WIN_POINTS: u32 = 1;
/// How far on each side of the guess the neighbor window reaches.
pub const NEIGHBOR_RADIUS: i64 = 2;
/// Losses in a row after which a game is removed.
pub const MAX_CONSECUTIVE_LOSSES: u32 = 3;

/// Inclusive guessing range. Only constructible through [`Bounds::new`], so a
/// value of this type always satisfies the range invariant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    min: i64,
    max: i64,
}

impl Bounds {
    pub fn new(min: i64, max: i64) -> Result<Self, GameError> {
        if min < 0 || max <= min || max - min < MIN_SPAN {
            return Err(GameError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }
}

/// A single guessing session, stored under its `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub min_number: i64,
    pub max_number: i64,
    pub level: u32,
    pub points: u32,
    pub consecutive_losses: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// What happened to the loss streak after a guess was settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Streak {
    Active(u32),
    Terminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayResult {
    Win,
    Lose,
}

impl Game {
    pub fn new(id: String, bounds: Bounds, now: DateTime<Utc>) -> Self {
        Self {
            id,
            min_number: bounds.min(),
            max_number: bounds.max(),
            level: 1,
            points: 0,
            consecutive_losses: 0,
            created_at: now,
            updated_at: None,
        }
    }

    /// Bounds as stored on the record. Snapshots are plain JSON, so a record
    /// loaded from disk is checked again here.
    pub fn bounds(&self) -> Result<Bounds, GameError> {
        Bounds::new(self.min_number, self.max_number)
    }

    pub fn set_bounds(&mut self, bounds: Bounds, now: DateTime<Utc>) {
        self.min_number = bounds.min();
        self.max_number = bounds.max();
        self.updated_at = Some(now);
    }

    /// Apply the outcome of one guess. A win adds `reward` and clears the
    /// streak; a loss extends it, and the third loss in a row terminates.
    pub fn settle(&mut self, result: PlayResult, reward: u32, now: DateTime<Utc>) -> Streak {
        self.updated_at = Some(now);
        match result {
            PlayResult::Win => {
                self.points = self.points.saturating_add(reward);
                self.consecutive_losses = 0;
                Streak::Active(0)
            }
            PlayResult::Lose => {
                self.consecutive_losses = self.consecutive_losses.saturating_add(1);
                if self.consecutive_losses >= MAX_CONSECUTIVE_LOSSES {
                    Streak::Terminated
                } else {
                    Streak::Active(self.consecutive_losses)
                }
            }
        }
    }
}

/// Every number within [`NEIGHBOR_RADIUS`] of `guess`, clipped to `bounds`,
/// ascending. Empty when the guess is too far outside the range.
pub fn neighbor_window(bounds: Bounds, guess: i64) -> Vec<i64> {
    let lo = bounds.min().max(guess.saturating_sub(NEIGHBOR_RADIUS));
    let hi = bounds.max().min(guess.saturating_add(NEIGHBOR_RADIUS));
    (lo..=hi).collect()
}
