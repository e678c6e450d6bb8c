use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::{
    error::GameError,
    game::Game,
    request::GameRequest,
    service::{ExactPlay, GameService, NeighborPlay},
};

#[derive(Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl GameError {
    pub fn status(&self) -> StatusCode {
        match self {
            GameError::Validation | GameError::InvalidBounds { .. } | GameError::Terminated(_) => {
                StatusCode::BAD_REQUEST
            }
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        tracing::debug!("request failed: {:?}", self);
        (self.status(), Json(MessageBody::new(self.to_string()))).into_response()
    }
}

/// Routes for the game API, backed by `service`.
pub fn router(service: GameService) -> Router {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/:id", get(get_game).delete(delete_game))
        .route("/games/:id/edit", put(edit_game))
        .route("/games/:id/play", put(play_exact))
        .route("/games/:id/neighbors", post(play_neighbors))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn list_games(State(service): State<GameService>) -> Json<Vec<Game>> {
    Json(service.list())
}

async fn create_game(
    State(service): State<GameService>,
    body: Bytes,
) -> Result<(StatusCode, Json<Game>), GameError> {
    let (min, max) = GameRequest::from_slice(&body)?.into_bounds()?;
    let game = service.create(min, max)?;
    Ok((StatusCode::CREATED, Json(game)))
}

async fn get_game(
    State(service): State<GameService>,
    Path(id): Path<String>,
) -> Result<Json<Game>, GameError> {
    service.get(&id).map(Json)
}

async fn delete_game(
    State(service): State<GameService>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, GameError> {
    service.delete(&id)?;
    Ok(Json(MessageBody::new("Game deleted successfully")))
}

async fn edit_game(
    State(service): State<GameService>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Game>, GameError> {
    let (min, max) = GameRequest::from_slice(&body)?.into_bounds()?;
    service.edit_bounds(&id, min, max).map(Json)
}

async fn play_exact(
    State(service): State<GameService>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ExactPlay>, GameError> {
    let guess = GameRequest::from_slice(&body)?.into_guess()?;
    service.play_exact(&id, guess).map(Json)
}

async fn play_neighbors(
    State(service): State<GameService>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<NeighborPlay>, GameError> {
    let guess = GameRequest::from_slice(&body)?.into_guess()?;
    service.play_neighbors(&id, guess).map(Json)
}
