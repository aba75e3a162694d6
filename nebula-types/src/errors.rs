use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// JSON body returned by the API for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Banner returned by the API root.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
}
