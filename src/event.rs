use serde::Deserialize;
use std::path::Path;

use crate::error::ActionError;

/// The parts of a webhook event payload this action reads.
#[derive(Debug, Default, Deserialize)]
pub struct EventPayload {
    pub issue: Option<ContentPayload>,
    pub pull_request: Option<ContentPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentPayload {
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Read the event payload the runner wrote to `path`.
pub fn load_payload(path: Option<&Path>) -> Result<EventPayload, ActionError> {
    let path = path.ok_or_else(|| {
        ActionError::UnsupportedEvent(
            "No event. Make sure this is an issue or pr event.".to_string(),
        )
    })?;
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ActionError::UnsupportedEvent(format!(
            "Failed to read event payload {}: {e}",
            path.display()
        ))
    })?;
    parse_payload(&contents)
}

pub fn parse_payload(contents: &str) -> Result<EventPayload, ActionError> {
    serde_json::from_str(contents)
        .map_err(|e| ActionError::UnsupportedEvent(format!("Failed to parse event payload: {e}")))
}
