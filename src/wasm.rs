//! WASM bindings for the frame solver
//!
//! Runs a solve directly in the browser: JSON request in, JSON response out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::prelude::*;
use crate::results::NodeDisplacements;
use crate::solve_with;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    pub model: Model,
    #[serde(default)]
    pub options: SolveOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displacements: Option<BTreeMap<String, NodeDisplacements>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SolveSummary>,
    pub ms_elapsed: u64,
}

/// Solve a structural model
///
/// Takes `{"model": {...}, "options": {...}}` and returns a JSON response
/// carrying either the displacements or the error message.
#[wasm_bindgen]
pub fn solve_json(request_json: &str) -> String {
    let start = js_sys::Date::now();

    let outcome = serde_json::from_str::<SolveRequest>(request_json)
        .map_err(FrameError::from)
        .and_then(|request| solve_with(&request.model, &request.options));

    let ms_elapsed = (js_sys::Date::now() - start) as u64;
    let response = match outcome {
        Ok(result) => SolveResponse {
            success: true,
            error: None,
            summary: Some(result.summary()),
            displacements: Some(result.displacements),
            ms_elapsed,
        },
        Err(e) => SolveResponse {
            success: false,
            error: Some(e.to_string()),
            displacements: None,
            summary: None,
            ms_elapsed,
        },
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(r#"{{"success":false,"error":"Serialization failed: {}"}}"#, e)
    })
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
