use serde::{Deserialize, Serialize};

use crate::error::ActionError;

/// A located board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    pub title: String,
}

/// A custom field as listed on a board. `settings` is the raw JSON string the API returns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectField {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub settings: Option<String>,
}

/// Membership of one content node in one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub id: String,
    pub project_id: String,
    pub content_id: String,
}

/// Variables of one field mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdate {
    pub project_id: String,
    pub item_id: String,
    pub field_id: String,
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
struct FieldSettings {
    #[serde(default)]
    options: Vec<SelectOption>,
    configuration: Option<IterationConfiguration>,
}

#[derive(Debug, Deserialize)]
struct SelectOption {
    id: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct IterationConfiguration {
    #[serde(default)]
    iterations: Vec<Iteration>,
    #[serde(default)]
    completed_iterations: Vec<Iteration>,
}

#[derive(Debug, Deserialize)]
struct Iteration {
    id: String,
    title: String,
}

impl ProjectField {
    fn parsed_settings(&self) -> FieldSettings {
        self.settings
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Option<FieldSettings>>(raw).ok())
            .flatten()
            .unwrap_or_default()
    }

    /// Translate a human value into what the field mutation expects.
    ///
    /// Single-select fields take an option id, iteration fields an iteration id;
    /// names and titles are matched case-sensitively. Other field types take the text as is.
    pub fn resolve_value(&self, value: &str) -> Result<String, ActionError> {
        let settings = self.parsed_settings();

        if !settings.options.is_empty() {
            return settings
                .options
                .iter()
                .find(|option| option.name == value)
                .map(|option| option.id.clone())
                .ok_or_else(|| self.unresolved(format!("no option named '{value}'")));
        }

        if let Some(configuration) = settings.configuration {
            return configuration
                .iterations
                .iter()
                .chain(configuration.completed_iterations.iter())
                .find(|iteration| iteration.title == value)
                .map(|iteration| iteration.id.clone())
                .ok_or_else(|| self.unresolved(format!("no iteration titled '{value}'")));
        }

        Ok(value.to_string())
    }

    fn unresolved(&self, reason: String) -> ActionError {
        ActionError::FieldResolutionFailed {
            field: self.name.clone(),
            reason,
        }
    }
}
