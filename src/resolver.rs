use crate::error::ActionError;
use crate::event::EventPayload;
use crate::model::context::{
    Content, ContentKind, FieldAssignment, InvocationContext, Owner, Token,
};

/// Raw configuration for one run, after flags, env and config file were merged.
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    pub github_token: Option<String>,
    pub project_number: Option<String>,
    pub organization: Option<String>,
    pub user: Option<String>,
    /// `owner/name` of the repository the event came from.
    pub repository: Option<String>,
    pub fields: Option<String>,
    pub fields_value: Option<String>,
    /// Assignments from the config file, overridden by `fields`/`fields_value`.
    pub default_fields: Vec<FieldAssignment>,
}

/// `None` for absent, empty or whitespace-only values.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Build the invocation context.
///
/// Checks run in a fixed order: token, project number, owner, then the event
/// payload. The payload is only loaded once the inputs are known to be usable.
pub fn resolve<F>(inputs: &ActionInputs, load_event: F) -> Result<InvocationContext, ActionError>
where
    F: FnOnce() -> Result<EventPayload, ActionError>,
{
    let token = non_empty(inputs.github_token.as_deref())
        .map(Token::new)
        .ok_or_else(|| ActionError::missing("github-token"))?;
    let project_number = parse_project_number(inputs.project_number.as_deref())?;
    let owner = resolve_owner(inputs)?;
    let content = resolve_content(load_event()?)?;

    let explicit = parse_field_mapping(inputs.fields.as_deref(), inputs.fields_value.as_deref());
    let fields = merge_fields(&inputs.default_fields, explicit);

    Ok(InvocationContext {
        token,
        project_number,
        owner,
        content,
        fields,
    })
}

fn parse_project_number(raw: Option<&str>) -> Result<u64, ActionError> {
    let raw = non_empty(raw).ok_or_else(|| ActionError::missing("project-number"))?;
    match raw.parse::<u64>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(ActionError::MissingInput(format!(
            "Input 'project-number' must be a positive integer, got '{raw}'"
        ))),
    }
}

fn resolve_owner(inputs: &ActionInputs) -> Result<Owner, ActionError> {
    let organization = non_empty(inputs.organization.as_deref());
    let user = non_empty(inputs.user.as_deref());

    match (organization, user) {
        (Some(_), Some(_)) => Err(ActionError::ConflictingInput),
        (Some(org), None) => Ok(Owner::Organization(org)),
        (None, Some(user)) => Ok(Owner::User(user)),
        (None, None) => repository_owner(inputs.repository.as_deref())
            .map(Owner::Organization)
            .ok_or_else(|| ActionError::MissingInput("No input 'organization' or 'user'".into())),
    }
}

fn repository_owner(repository: Option<&str>) -> Option<String> {
    let repository = non_empty(repository)?;
    let (owner, _name) = repository.split_once('/')?;
    non_empty(Some(owner))
}

fn resolve_content(payload: EventPayload) -> Result<Content, ActionError> {
    let (kind, node) = match (payload.issue, payload.pull_request) {
        (Some(issue), _) => (ContentKind::Issue, issue),
        (None, Some(pr)) => (ContentKind::PullRequest, pr),
        (None, None) => {
            return Err(ActionError::UnsupportedEvent(
                "No issue or pr in event context".into(),
            ))
        }
    };

    let node_id = non_empty(node.node_id.as_deref()).ok_or_else(|| {
        ActionError::UnsupportedEvent("Can't find 'node_id' in event context".into())
    })?;

    Ok(Content {
        node_id,
        kind,
        title: node.title.unwrap_or_default(),
    })
}

/// Zip comma-separated names with comma-separated values by position.
///
/// A name without a (non-empty) value at the same index is dropped.
pub fn parse_field_mapping(names: Option<&str>, values: Option<&str>) -> Vec<FieldAssignment> {
    let Some(names) = names else {
        return Vec::new();
    };
    let values: Vec<&str> = values
        .map(|v| v.split(',').map(str::trim).collect())
        .unwrap_or_default();

    names
        .split(',')
        .map(str::trim)
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .filter_map(|(i, name)| {
            values
                .get(i)
                .filter(|value| !value.is_empty())
                .map(|value| FieldAssignment::new(name, *value))
        })
        .collect()
}

fn merge_fields(defaults: &[FieldAssignment], explicit: Vec<FieldAssignment>) -> Vec<FieldAssignment> {
    let mut merged: Vec<FieldAssignment> = defaults
        .iter()
        .filter(|d| !explicit.iter().any(|e| e.name == d.name))
        .cloned()
        .collect();
    merged.extend(explicit);
    merged
}
