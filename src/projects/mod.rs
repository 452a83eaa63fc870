pub mod github;

use async_trait::async_trait;

use crate::error::ActionError;
use crate::model::context::Owner;
use crate::model::project::{FieldUpdate, ProjectField, ProjectRef};

/// Boards API as the reconciliation routine sees it.
///
/// "Nothing came back" is `Ok(None)`; `Err` is reserved for transport and
/// protocol failures.
#[async_trait]
pub trait ProjectsApi: Send + Sync {
    /// Look up board `number` of `owner`.
    async fn find_project(
        &self,
        owner: &Owner,
        number: u64,
    ) -> Result<Option<ProjectRef>, ActionError>;

    /// Attach a content node to a board. Returns the new item id.
    async fn add_item(
        &self,
        project_id: &str,
        content_id: &str,
    ) -> Result<Option<String>, ActionError>;

    /// First page of the board's custom fields.
    async fn list_fields(&self, project_id: &str) -> Result<Vec<ProjectField>, ActionError>;

    /// Write one field value on an item. Returns the item id echoed back.
    async fn update_field(&self, update: &FieldUpdate) -> Result<Option<String>, ActionError>;
}

#[cfg(test)]
pub mod tests;
