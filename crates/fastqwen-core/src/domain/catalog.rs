//! Model catalog for `GET /v1/models`.
//!
//! The gateway serves exactly one model, so the catalog is static.

use serde::{Deserialize, Serialize};

/// Creation timestamp advertised for the served model.
pub const MODEL_CREATED_AT: i64 = 1_677_610_602;

/// Owner advertised for the served model.
pub const MODEL_OWNER: &str = "self-hosted";

/// Response from `/v1/models`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<ModelCard>,
}

impl ModelList {
    /// A catalog containing only `model_id`.
    pub fn single(model_id: impl Into<String>) -> Self {
        Self {
            object: "list".to_string(),
            data: vec![ModelCard::new(model_id)],
        }
    }
}

/// Information about a single model (OpenAI format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCard {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

impl ModelCard {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object: "model".to_string(),
            created: MODEL_CREATED_AT,
            owned_by: MODEL_OWNER.to_string(),
        }
    }
}
