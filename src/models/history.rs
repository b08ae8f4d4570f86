use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub prompt: String,
    pub image_url: String,
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(prompt: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            prompt: prompt.into(),
            image_url: image_url.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
