use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::GameError,
    game::{
        Bounds, EXACT_WIN_POINTS, Game, NEIGHBOR_WIN_POINTS, PlayResult, Streak, neighbor_window,
    },
    rng::NumberSource,
    store::GameStore,
};

/// Reply to an exact guess.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactPlay {
    pub result: PlayResult,
    pub total_score: u32,
}

/// Reply to a neighbor guess, including the window that was checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborPlay {
    pub result: PlayResult,
    pub total_score: u32,
    pub border_array: Vec<i64>,
}

/// Game lifecycle and guess adjudication on top of a [`GameStore`].
///
/// Each operation does one read and at most one write or delete. Nothing is
/// locked between the two, so concurrent plays on one game are last write
/// wins.
#[derive(Clone)]
pub struct GameService {
    store: Arc<dyn GameStore>,
    numbers: Arc<dyn NumberSource>,
}

impl GameService {
    pub fn new(store: Arc<dyn GameStore>, numbers: Arc<dyn NumberSource>) -> Self {
        Self { store, numbers }
    }

    pub fn create(&self, min_number: i64, max_number: i64) -> Result<Game, GameError> {
        let bounds = Bounds::new(min_number, max_number)?;
        let game = Game::new(Uuid::new_v4().to_string(), bounds, Utc::now());
        self.store.put(&game.id, game.clone());
        tracing::info!("created game {} [{}, {}]", game.id, min_number, max_number);
        Ok(game)
    }

    pub fn list(&self) -> Vec<Game> {
        self.store.list_all()
    }

    pub fn get(&self, id: &str) -> Result<Game, GameError> {
        self.store
            .get(id)
            .ok_or_else(|| GameError::NotFound(id.to_string()))
    }

    pub fn delete(&self, id: &str) -> Result<(), GameError> {
        if !self.store.delete(id) {
            return Err(GameError::NotFound(id.to_string()));
        }
        tracing::info!("deleted game {}", id);
        Ok(())
    }

    pub fn edit_bounds(
        &self,
        id: &str,
        min_number: i64,
        max_number: i64,
    ) -> Result<Game, GameError> {
        let mut game = self.get(id)?;
        let bounds = Bounds::new(min_number, max_number)?;
        game.set_bounds(bounds, Utc::now());
        self.store.put(id, game.clone());
        tracing::info!("edited game {} -> [{}, {}]", id, min_number, max_number);
        Ok(game)
    }

    pub fn play_exact(&self, id: &str, guess: i64) -> Result<ExactPlay, GameError> {
        let mut game = self.get(id)?;
        let bounds = game.bounds()?;
        let target = self.numbers.draw(bounds.min(), bounds.max());
        let result = if guess == target {
            PlayResult::Win
        } else {
            PlayResult::Lose
        };

        self.settle(&mut game, result, EXACT_WIN_POINTS)?;
        Ok(ExactPlay {
            result,
            total_score: game.points,
        })
    }

    pub fn play_neighbors(&self, id: &str, guess: i64) -> Result<NeighborPlay, GameError> {
        let mut game = self.get(id)?;
        let bounds = game.bounds()?;
        let border_array = neighbor_window(bounds, guess);
        let target = self.numbers.draw(bounds.min(), bounds.max());
        let result = if border_array.contains(&target) {
            PlayResult::Win
        } else {
            PlayResult::Lose
        };

        self.settle(&mut game, result, NEIGHBOR_WIN_POINTS)?;
        Ok(NeighborPlay {
            result,
            total_score: game.points,
            border_array,
        })
    }

    /// Write back a played game, or drop it if the loss streak ran out.
    fn settle(&self, game: &mut Game, result: PlayResult, reward: u32) -> Result<(), GameError> {
        match game.settle(result, reward, Utc::now()) {
            Streak::Terminated => {
                self.store.delete(&game.id);
                tracing::info!(
                    "terminated game {} after {} losses, final points={}",
                    game.id,
                    game.consecutive_losses,
                    game.points
                );
                Err(GameError::Terminated(game.id.clone()))
            }
            Streak::Active(losses) => {
                self.store.put(&game.id, game.clone());
                tracing::info!(
                    "{:?}: game={} points={} losses={}",
                    result,
                    game.id,
                    game.points,
                    losses
                );
                Ok(())
            }
        }
    }
}
