use serde_json::{Map, Value};

use crate::error::GameError;

/// The two body shapes the API accepts. Anything else is rejected before
/// a game is even looked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameRequest {
    Bounds { min_number: i64, max_number: i64 },
    Guess { guess: i64 },
}

impl GameRequest {
    /// Classify a raw request body. `{minNumber, maxNumber}` without `guess`
    /// or `{guess}` without either bound; all present fields must be
    /// integral numbers. Other keys are ignored.
    pub fn from_json(body: &Value) -> Result<Self, GameError> {
        let obj = body.as_object().ok_or(GameError::Validation)?;
        let has = |k: &str| obj.contains_key(k);

        match (has("minNumber"), has("maxNumber"), has("guess")) {
            (true, true, false) => Ok(GameRequest::Bounds {
                min_number: integer_field(obj, "minNumber")?,
                max_number: integer_field(obj, "maxNumber")?,
            }),
            (false, false, true) => Ok(GameRequest::Guess {
                guess: integer_field(obj, "guess")?,
            }),
            _ => Err(GameError::Validation),
        }
    }

    /// Parse raw body bytes. Empty or non-JSON bodies are a validation error.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, GameError> {
        let body: Value = serde_json::from_slice(bytes).map_err(|_| GameError::Validation)?;
        Self::from_json(&body)
    }

    pub fn into_bounds(self) -> Result<(i64, i64), GameError> {
        match self {
            GameRequest::Bounds {
                min_number,
                max_number,
            } => Ok((min_number, max_number)),
            GameRequest::Guess { .. } => Err(GameError::Validation),
        }
    }

    pub fn into_guess(self) -> Result<i64, GameError> {
        match self {
            GameRequest::Guess { guess } => Ok(guess),
            GameRequest::Bounds { .. } => Err(GameError::Validation),
        }
    }
}

/// Read `key` as an `i64`. Bounds and drawn targets are whole numbers, so
/// fractional values and values outside `i64` are rejected, never truncated.
fn integer_field(obj: &Map<String, Value>, key: &str) -> Result<i64, GameError> {
    let v = obj.get(key).ok_or(GameError::Validation)?;
    if let Some(n) = v.as_i64() {
        return Ok(n);
    }
    // JSON has one number type; accept 5.0 but not 5.5
    match v.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(GameError::Validation),
    }
}
