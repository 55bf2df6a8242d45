//! Request payload sent to the advisory services.

use serde::Serialize;
use serde_json::Value;

use crate::models::Factory;

/// Body of an optimize or simulate call.
///
/// `status`, `message` and `timestamp` are always sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryRequest {
    pub factory_data: Value,
    pub grid_data: Value,
    pub user_message: String,
    pub status: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
}

impl AdvisoryRequest {
    /// Request carrying the current board and the user's query.
    pub fn new(factory: &Factory, user_message: impl Into<String>) -> Self {
        Self {
            factory_data: factory.factory_data(),
            grid_data: factory.grid.clone(),
            user_message: user_message.into(),
            status: None,
            message: None,
            timestamp: None,
        }
    }
}
