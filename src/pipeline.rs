use std::io::Write;

use tracing::{debug, info};

use crate::error::ActionError;
use crate::model::context::InvocationContext;
use crate::model::project::{FieldUpdate, ProjectField, ProjectItem, ProjectRef};
use crate::projects::ProjectsApi;
use crate::report::{bold, Reporter};

/// What a successful run did.
#[derive(Debug)]
pub struct Outcome {
    pub project: ProjectRef,
    pub item: ProjectItem,
    pub updated_fields: Vec<String>,
    /// Always `FieldResolutionFailed`.
    pub skipped_fields: Vec<ActionError>,
}

#[derive(Debug, Default)]
struct FieldReport {
    updated: Vec<String>,
    skipped: Vec<ActionError>,
}

/// Locate the board, add the triggering content, then write the requested field values.
///
/// Stops at the first failing stage. Field updates are awaited one at a time and
/// are not rolled back when a later one fails.
pub async fn reconcile<W: Write>(
    ctx: &InvocationContext,
    api: &dyn ProjectsApi,
    reporter: &mut Reporter<W>,
) -> Result<Outcome, ActionError> {
    let content = &ctx.content;

    let project = reporter
        .group(
            &format!("Get project number {}", bold(ctx.project_number)),
            api.find_project(&ctx.owner, ctx.project_number),
        )
        .await?
        .ok_or_else(|| ActionError::ProjectNotFound {
            number: ctx.project_number,
            owner: ctx.owner.clone(),
        })?;
    info!(project_id = %project.id, title = %project.title, "located project");

    let item_id = reporter
        .group(
            &format!(
                "Add {} {} to project {}",
                content.kind,
                bold(&content.title),
                bold(&project.title)
            ),
            api.add_item(&project.id, &content.node_id),
        )
        .await?
        .ok_or_else(|| ActionError::InsertFailed {
            kind: content.kind,
            title: content.title.clone(),
            project_title: project.title.clone(),
        })?;
    let item = ProjectItem {
        id: item_id,
        project_id: project.id.clone(),
        content_id: content.node_id.clone(),
    };
    info!(
        item_id = %item.id,
        content_id = %item.content_id,
        kind = content.kind.as_str(),
        "added item"
    );

    let fields = if ctx.fields.is_empty() {
        FieldReport::default()
    } else {
        reporter.start_group(&format!("Update fields on item {}", bold(&item.id)));
        let result = update_fields(ctx, api, &item, reporter).await;
        reporter.end_group();
        result?
    };

    let mut summary = format!(
        "✅ Successfully added {} {} to project {}.",
        content.kind,
        bold(&content.title),
        bold(&project.title)
    );
    if !fields.updated.is_empty() {
        summary.push_str(&format!("\nUpdated fields: {}.", fields.updated.join(", ")));
    }
    if !fields.skipped.is_empty() {
        summary.push_str(&format!("\nSkipped {} field(s).", fields.skipped.len()));
    }
    summary.push('\n');
    summary.push_str(&ctx.owner.project_url(ctx.project_number));
    reporter.info(&summary);

    Ok(Outcome {
        project,
        item,
        updated_fields: fields.updated,
        skipped_fields: fields.skipped,
    })
}

async fn update_fields<W: Write>(
    ctx: &InvocationContext,
    api: &dyn ProjectsApi,
    item: &ProjectItem,
    reporter: &mut Reporter<W>,
) -> Result<FieldReport, ActionError> {
    let fields = api.list_fields(&item.project_id).await?;
    debug!(count = fields.len(), "fetched project fields");

    let mut report = FieldReport::default();
    for assignment in &ctx.fields {
        let update = match plan_update(&fields, item, &assignment.name, &assignment.value) {
            Ok(update) => update,
            Err(err) => {
                reporter.warning(&err.to_string());
                report.skipped.push(err);
                continue;
            }
        };

        api.update_field(&update).await?.ok_or_else(|| {
            ActionError::GraphQl(format!(
                "Failed to update field '{}' on item {}",
                assignment.name, item.id
            ))
        })?;
        info!(field = %assignment.name, "updated field");
        report.updated.push(assignment.name.clone());
    }
    Ok(report)
}

fn plan_update(
    fields: &[ProjectField],
    item: &ProjectItem,
    name: &str,
    value: &str,
) -> Result<FieldUpdate, ActionError> {
    let field = fields.iter().find(|f| f.name == name).ok_or_else(|| {
        ActionError::FieldResolutionFailed {
            field: name.to_string(),
            reason: "no field with this name on the project".into(),
        }
    })?;

    Ok(FieldUpdate {
        project_id: item.project_id.clone(),
        item_id: item.id.clone(),
        field_id: field.id.clone(),
        value: field.resolve_value(value)?,
    })
}
