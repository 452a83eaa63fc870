use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::ProjectsApi;
use crate::error::ActionError;
use crate::model::context::Owner;
use crate::model::project::{FieldUpdate, ProjectField, ProjectRef};

/// In-memory boards API that records every call it receives.
pub struct MockProjects {
    pub project: Option<ProjectRef>,
    pub item_id: Option<String>,
    pub fields: Vec<ProjectField>,
    pub fail_updates_for: Option<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub updates: Arc<Mutex<Vec<FieldUpdate>>>,
}

impl MockProjects {
    pub fn new() -> Self {
        Self {
            project: Some(ProjectRef {
                id: "PN_1".into(),
                title: "Roadmap".into(),
            }),
            item_id: Some("PNI_1".into()),
            fields: Vec::new(),
            fail_updates_for: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn without_project(mut self) -> Self {
        self.project = None;
        self
    }

    pub fn without_item(mut self) -> Self {
        self.item_id = None;
        self
    }

    pub fn with_fields(mut self, fields: Vec<ProjectField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn failing_update(mut self, field_id: &str) -> Self {
        self.fail_updates_for = Some(field_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ProjectsApi for MockProjects {
    async fn find_project(
        &self,
        owner: &Owner,
        number: u64,
    ) -> Result<Option<ProjectRef>, ActionError> {
        self.record(format!("find_project {} {number}", owner.login()));
        Ok(self.project.clone())
    }

    async fn add_item(
        &self,
        project_id: &str,
        content_id: &str,
    ) -> Result<Option<String>, ActionError> {
        self.record(format!("add_item {project_id} {content_id}"));
        Ok(self.item_id.clone())
    }

    async fn list_fields(&self, project_id: &str) -> Result<Vec<ProjectField>, ActionError> {
        self.record(format!("list_fields {project_id}"));
        Ok(self.fields.clone())
    }

    async fn update_field(&self, update: &FieldUpdate) -> Result<Option<String>, ActionError> {
        self.record(format!("update_field {}", update.field_id));
        if self.fail_updates_for.as_deref() == Some(update.field_id.as_str()) {
            return Err(ActionError::GraphQl("Mock failure".into()));
        }
        self.updates.lock().unwrap().push(update.clone());
        Ok(Some(update.item_id.clone()))
    }
}

pub fn field(id: &str, name: &str, settings: Option<&str>) -> ProjectField {
    ProjectField {
        id: id.to_string(),
        name: name.to_string(),
        settings: settings.map(String::from),
    }
}

#[tokio::test]
async fn mock_records_calls_in_order() {
    let api = MockProjects::new();
    let project = api
        .find_project(&Owner::Organization("github".into()), 5)
        .await
        .unwrap()
        .unwrap();
    api.add_item(&project.id, "I_1").await.unwrap();

    assert_eq!(api.calls(), ["find_project github 5", "add_item PN_1 I_1"]);
}

#[tokio::test]
async fn mock_update_failure_propagates() {
    let api = MockProjects::new().failing_update("F_1");
    let update = FieldUpdate {
        project_id: "PN_1".into(),
        item_id: "PNI_1".into(),
        field_id: "F_1".into(),
        value: "x".into(),
    };
    let err = api.update_field(&update).await.unwrap_err();
    assert!(err.to_string().contains("Mock failure"));
    assert!(api.updates.lock().unwrap().is_empty());
}

#[test]
fn text_field_takes_value_as_is() {
    let notes = field("F_notes", "Notes", Some("null"));
    assert_eq!(notes.resolve_value("anything goes").unwrap(), "anything goes");

    let bare = field("F_bare", "Bare", None);
    assert_eq!(bare.resolve_value("x").unwrap(), "x");
}

#[test]
fn single_select_resolves_option_id() {
    let status = field(
        "F_status",
        "Status",
        Some(r#"{"width":120,"options":[{"id":"o_todo","name":"Todo"},{"id":"o_done","name":"Done"}]}"#),
    );
    assert_eq!(status.resolve_value("Done").unwrap(), "o_done");
}

#[test]
fn single_select_match_is_case_sensitive() {
    let status = field(
        "F_status",
        "Status",
        Some(r#"{"options":[{"id":"o_done","name":"Done"}]}"#),
    );
    let err = status.resolve_value("done").unwrap_err();
    assert!(matches!(
        err,
        ActionError::FieldResolutionFailed { ref field, .. } if field == "Status"
    ));
}

#[test]
fn iteration_resolves_current_and_completed() {
    let sprint = field(
        "F_sprint",
        "Sprint",
        Some(
            r#"{"configuration":{"duration":14,"iterations":[{"id":"it_3","title":"Sprint 3"}],"completed_iterations":[{"id":"it_2","title":"Sprint 2"}]}}"#,
        ),
    );
    assert_eq!(sprint.resolve_value("Sprint 3").unwrap(), "it_3");
    assert_eq!(sprint.resolve_value("Sprint 2").unwrap(), "it_2");
    assert!(sprint.resolve_value("Sprint 9").is_err());
}

#[test]
fn unparseable_settings_fall_back_to_text() {
    let odd = field("F_odd", "Odd", Some("{not json"));
    assert_eq!(odd.resolve_value("v").unwrap(), "v");
}
