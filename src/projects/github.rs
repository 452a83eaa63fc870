//! GraphQL client for GitHub Projects (beta boards).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::ProjectsApi;
use crate::error::ActionError;
use crate::model::context::Owner;
use crate::model::project::{FieldUpdate, ProjectField, ProjectRef};

pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Fields are fetched in a single page of this size.
pub const FIELD_PAGE_SIZE: u32 = 20;

const FEATURES_HEADER: &str = "graphql-features";
const FEATURES: &str = "projects_next_graphql";

const ORGANIZATION_PROJECT_QUERY: &str = r"
    query OrganizationProject($login: String!, $number: Int!) {
        organization(login: $login) {
            projectNext(number: $number) {
                id
                title
            }
        }
    }
";

const USER_PROJECT_QUERY: &str = r"
    query UserProject($login: String!, $number: Int!) {
        user(login: $login) {
            projectNext(number: $number) {
                id
                title
            }
        }
    }
";

const ADD_ITEM_MUTATION: &str = r"
    mutation AddItem($projectId: ID!, $contentId: ID!) {
        addProjectNextItem(input: { projectId: $projectId, contentId: $contentId }) {
            projectNextItem {
                id
            }
        }
    }
";

const FIELDS_QUERY: &str = r"
    query ProjectFields($projectId: ID!, $first: Int!) {
        node(id: $projectId) {
            ... on ProjectNext {
                fields(first: $first) {
                    nodes {
                        id
                        name
                        settings
                    }
                }
            }
        }
    }
";

const UPDATE_FIELD_MUTATION: &str = r"
    mutation UpdateField($projectId: ID!, $itemId: ID!, $fieldId: ID!, $value: String!) {
        updateProjectNextItemField(
            input: { projectId: $projectId, itemId: $itemId, fieldId: $fieldId, value: $value }
        ) {
            projectNextItem {
                id
            }
        }
    }
";

#[derive(Debug, Serialize)]
struct GraphQlRequest<V: Serialize> {
    query: &'static str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

// Project lookup

#[derive(Deserialize)]
struct ProjectLookup {
    organization: Option<OwnerNode>,
    user: Option<OwnerNode>,
}

#[derive(Deserialize)]
struct OwnerNode {
    #[serde(rename = "projectNext")]
    project_next: Option<ProjectNode>,
}

#[derive(Deserialize)]
struct ProjectNode {
    id: Option<String>,
    title: Option<String>,
}

// Item mutations

#[derive(Deserialize)]
struct AddItemData {
    #[serde(rename = "addProjectNextItem")]
    add_project_next_item: Option<ItemPayload>,
}

#[derive(Deserialize)]
struct UpdateFieldData {
    #[serde(rename = "updateProjectNextItemField")]
    update_project_next_item_field: Option<ItemPayload>,
}

#[derive(Deserialize)]
struct ItemPayload {
    #[serde(rename = "projectNextItem")]
    project_next_item: Option<ItemNode>,
}

#[derive(Deserialize)]
struct ItemNode {
    id: Option<String>,
}

impl ItemPayload {
    fn item_id(self) -> Option<String> {
        self.project_next_item
            .and_then(|item| item.id)
            .filter(|id| !id.is_empty())
    }
}

// Field listing

#[derive(Deserialize)]
struct FieldsData {
    node: Option<FieldsNode>,
}

#[derive(Deserialize)]
struct FieldsNode {
    fields: Option<FieldConnection>,
}

#[derive(Deserialize)]
struct FieldConnection {
    #[serde(default)]
    nodes: Vec<Option<ProjectField>>,
}

pub struct GitHubProjects {
    client: reqwest::Client,
    api_url: String,
}

impl GitHubProjects {
    pub fn new(token: &str, api_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("bearer {token}")).context("Invalid GitHub token")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("add-to-project/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(FEATURES_HEADER, HeaderValue::from_static(FEATURES));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// Send one operation. GraphQL `errors` are logged; callers judge `data`.
    async fn execute<V: Serialize, R: DeserializeOwned>(
        &self,
        query: &'static str,
        variables: V,
    ) -> Result<GraphQlResponse<R>, ActionError> {
        let response = self
            .client
            .post(&self.api_url)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ActionError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let raw: serde_json::Value = serde_json::from_str(&body)?;
        info!("{}", serde_json::to_string_pretty(&raw)?);

        let parsed: GraphQlResponse<R> = serde_json::from_value(raw)?;
        for error in parsed.errors.iter().flatten() {
            warn!(message = %error.message, "GraphQL error");
        }
        Ok(parsed)
    }
}

impl<T> GraphQlResponse<T> {
    fn error_summary(&self) -> Option<String> {
        let errors = self.errors.as_ref().filter(|e| !e.is_empty())?;
        Some(
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

#[async_trait]
impl ProjectsApi for GitHubProjects {
    #[instrument(skip(self), fields(login = %owner.login()))]
    async fn find_project(
        &self,
        owner: &Owner,
        number: u64,
    ) -> Result<Option<ProjectRef>, ActionError> {
        #[derive(Serialize)]
        struct Variables<'a> {
            login: &'a str,
            number: u64,
        }

        let query = match owner {
            Owner::Organization(_) => ORGANIZATION_PROJECT_QUERY,
            Owner::User(_) => USER_PROJECT_QUERY,
        };
        let variables = Variables {
            login: owner.login(),
            number,
        };

        let response: GraphQlResponse<ProjectLookup> = self.execute(query, variables).await?;
        let project = response
            .data
            .and_then(|data| match owner {
                Owner::Organization(_) => data.organization,
                Owner::User(_) => data.user,
            })
            .and_then(|node| node.project_next)
            .and_then(|project| {
                let id = project.id.filter(|id| !id.is_empty())?;
                Some(ProjectRef {
                    id,
                    title: project.title.unwrap_or_default(),
                })
            });
        Ok(project)
    }

    #[instrument(skip(self))]
    async fn add_item(
        &self,
        project_id: &str,
        content_id: &str,
    ) -> Result<Option<String>, ActionError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables<'a> {
            project_id: &'a str,
            content_id: &'a str,
        }

        let response: GraphQlResponse<AddItemData> = self
            .execute(
                ADD_ITEM_MUTATION,
                Variables {
                    project_id,
                    content_id,
                },
            )
            .await?;
        Ok(response
            .data
            .and_then(|data| data.add_project_next_item)
            .and_then(ItemPayload::item_id))
    }

    #[instrument(skip(self))]
    async fn list_fields(&self, project_id: &str) -> Result<Vec<ProjectField>, ActionError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables<'a> {
            project_id: &'a str,
            first: u32,
        }

        let response: GraphQlResponse<FieldsData> = self
            .execute(
                FIELDS_QUERY,
                Variables {
                    project_id,
                    first: FIELD_PAGE_SIZE,
                },
            )
            .await?;
        let fields = response
            .data
            .and_then(|data| data.node)
            .and_then(|node| node.fields)
            .map(|connection| connection.nodes.into_iter().flatten().collect())
            .unwrap_or_default();
        Ok(fields)
    }

    #[instrument(skip(self, update), fields(field_id = %update.field_id))]
    async fn update_field(&self, update: &FieldUpdate) -> Result<Option<String>, ActionError> {
        let response: GraphQlResponse<UpdateFieldData> =
            self.execute(UPDATE_FIELD_MUTATION, update).await?;
        let summary = response.error_summary();
        let item_id = response
            .data
            .and_then(|data| data.update_project_next_item_field)
            .and_then(ItemPayload::item_id);

        match (item_id, summary) {
            (Some(id), _) => Ok(Some(id)),
            (None, Some(summary)) => Err(ActionError::GraphQl(summary)),
            (None, None) => Ok(None),
        }
    }
}
