use axum::Json;
use serde_json::{json, Value};

use crate::text::lexicon;

/// GET /health
/// Returns a simple status object with service and lexicon versions.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-optimizer",
        "lexicon_version": lexicon::get().version,
    }))
}
