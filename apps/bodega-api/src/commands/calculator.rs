//! Keypad calculator.
//!
//! The display lives in the dashboard; each request replays the pressed
//! keys on top of it.

use axum::Json;
use bodega_core::calculator::{Calculator, Key};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct CalculatorRequest {
    #[serde(default)]
    pub display: String,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalculatorResponse {
    pub display: String,
}

/// `POST /calculator`
pub async fn press(Json(body): Json<CalculatorRequest>) -> ApiResult<Json<CalculatorResponse>> {
    debug!(display = %body.display, keys = body.keys.len(), "calculator command");

    let keys = body
        .keys
        .iter()
        .map(|k| k.parse::<Key>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut calculator = Calculator::with_display(body.display);
    calculator.press_all(keys);

    Ok(Json(CalculatorResponse {
        display: calculator.display().to_string(),
    }))
}
