use crate::edits::{apply_key_value_edits, reduce_key_value_edits, KeyValueEdit};
use crate::error::ProtocolError;
use crate::parse::parse_yaml_mapping;
use crate::roles::{BasicInfoSource, TaskRoleSource};
use indexmap::IndexMap;
use pai_core::{is_empty_value, prune_empty, prune_empty_map};
use pai_schema::versions::JOB_PROTOCOL_VERSION;
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_DEPLOYMENT_NAME: &str = "defaultDeployment";
const DEFAULT_JOB_TYPE: &str = "job";

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub name: String,
    pub task_roles: Map<String, Value>,
}

impl Deployment {
    fn from_value(value: &Value) -> Self {
        Self {
            name: string_field(value.get("name")),
            task_roles: map_field(value.get("taskRoles")),
        }
    }
}

/// Canonical in-memory form of a version 2 job protocol document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolDocument {
    pub protocol_version: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub version: String,
    pub contributor: String,
    pub description: String,
    pub job_retry_count: u32,
    pub prerequisites: Vec<Value>,
    pub parameters: Map<String, Value>,
    pub task_roles: Map<String, Value>,
    pub deployments: Vec<Deployment>,
    pub secrets: Map<String, Value>,
    pub defaults: Map<String, Value>,
    pub extras: Map<String, Value>,
}

impl Default for ProtocolDocument {
    fn default() -> Self {
        Self {
            protocol_version: JOB_PROTOCOL_VERSION,
            name: String::new(),
            job_type: DEFAULT_JOB_TYPE.to_string(),
            version: String::new(),
            contributor: String::new(),
            description: String::new(),
            job_retry_count: 0,
            prerequisites: Vec::new(),
            parameters: Map::new(),
            task_roles: Map::new(),
            deployments: Vec::new(),
            secrets: Map::new(),
            defaults: Map::new(),
            extras: Map::new(),
        }
    }
}

impl ProtocolDocument {
    /// Builds a document from loosely typed fields. Missing fields, and fields
    /// whose value has the wrong shape, take their empty default; unknown keys
    /// and `protocolVersion` are ignored.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let mut document = Self::default();
        document.apply_fields(fields);
        document
    }

    pub fn from_yaml(input: &str) -> Result<Self, ProtocolError> {
        let fields = parse_yaml_mapping(input).map_err(ProtocolError::Parse)?;
        let document = Self::from_fields(&fields);
        tracing::debug!(
            name = %document.name,
            task_roles = document.task_roles.len(),
            prerequisites = document.prerequisites.len(),
            "parsed protocol document"
        );
        Ok(document)
    }

    /// The serializable form with every empty field pruned.
    pub fn to_value(&self) -> Result<Value, ProtocolError> {
        let value = serde_json::to_value(self)?;
        Ok(prune_empty(&value))
    }

    pub fn to_yaml(&self) -> Result<String, ProtocolError> {
        let value = self.to_value()?;
        Ok(serde_yaml::to_string(&value)?)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        let value = self.to_value()?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// `defaults.deployment` when set, else the name of the document's only
    /// deployment group, else `defaultDeployment`.
    pub fn default_deployment_name(&self) -> &str {
        let configured = self
            .defaults
            .get("deployment")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty());
        let single = match self.deployments.as_slice() {
            [only] if !only.name.is_empty() => Some(only.name.as_str()),
            _ => None,
        };
        configured.or(single).unwrap_or(DEFAULT_DEPLOYMENT_NAME)
    }

    /// The deployment group the editor works on: the one named by
    /// [`ProtocolDocument::default_deployment_name`], else the only group the
    /// document carries.
    pub fn default_deployment(&self) -> Option<&Deployment> {
        let name = self.default_deployment_name();
        self.deployments
            .iter()
            .find(|deployment| deployment.name == name)
            .or(match self.deployments.as_slice() {
                [only] => Some(only),
                _ => None,
            })
    }

    pub fn find_prerequisite(&self, name: &str) -> Option<&Value> {
        self.prerequisites
            .iter()
            .find(|prerequisite| prerequisite.get("name").and_then(Value::as_str) == Some(name))
    }

    /// Rebuilds the document from the editor's state. Fields the editor does not
    /// own (version, extras, ...) carry over from `self`.
    pub fn derive_updated<B, R>(
        &self,
        basic_info: &B,
        task_roles: &[R],
        parameter_edits: &[KeyValueEdit],
        secret_edits: &[KeyValueEdit],
    ) -> Self
    where
        B: BasicInfoSource + ?Sized,
        R: TaskRoleSource,
    {
        self.derive_with(
            basic_info,
            task_roles,
            reduce_key_value_edits(parameter_edits),
            reduce_key_value_edits(secret_edits),
        )
    }

    /// Like [`ProtocolDocument::derive_updated`], but the edits are applied on
    /// top of the current parameters and secrets instead of replacing them.
    pub fn derive_with_applied_edits<B, R>(
        &self,
        basic_info: &B,
        task_roles: &[R],
        parameter_edits: &[KeyValueEdit],
        secret_edits: &[KeyValueEdit],
    ) -> Self
    where
        B: BasicInfoSource + ?Sized,
        R: TaskRoleSource,
    {
        self.derive_with(
            basic_info,
            task_roles,
            apply_key_value_edits(&self.parameters, parameter_edits),
            apply_key_value_edits(&self.secrets, secret_edits),
        )
    }

    fn derive_with<B, R>(
        &self,
        basic_info: &B,
        task_roles: &[R],
        parameters: Map<String, Value>,
        secrets: Map<String, Value>,
    ) -> Self
    where
        B: BasicInfoSource + ?Sized,
        R: TaskRoleSource,
    {
        let deployments = self.generate_deployments(task_roles);
        let prerequisites = collect_prerequisites(task_roles);
        let converted_roles = convert_task_roles(task_roles);
        let defaults = prune_empty_map(&basic_info.defaults());

        let mut updated = self.clone();
        updated.apply_fields(&basic_info.to_protocol_format());
        updated.protocol_version = JOB_PROTOCOL_VERSION;
        updated.parameters = parameters;
        updated.secrets = secrets;
        updated.deployments = deployments;
        updated.prerequisites = prerequisites;
        updated.task_roles = converted_roles;
        updated.defaults = defaults;

        tracing::debug!(
            name = %updated.name,
            task_roles = updated.task_roles.len(),
            prerequisites = updated.prerequisites.len(),
            deployments = updated.deployments.len(),
            "derived updated protocol document"
        );
        updated
    }

    fn generate_deployments<R: TaskRoleSource>(&self, task_roles: &[R]) -> Vec<Deployment> {
        let fragments = task_roles
            .iter()
            .filter_map(|role| {
                role.deployment()
                    .map(|fragment| (role.name().to_string(), prune_empty(&fragment)))
            })
            .filter(|(_, fragment)| !is_empty_value(fragment))
            .collect::<Map<String, Value>>();

        if fragments.is_empty() {
            return Vec::new();
        }
        vec![Deployment {
            name: self.default_deployment_name().to_string(),
            task_roles: fragments,
        }]
    }

    fn apply_fields(&mut self, fields: &Map<String, Value>) {
        for (key, value) in fields {
            let value = Some(value);
            match key.as_str() {
                "name" => self.name = string_field(value),
                "type" => {
                    let job_type = string_field(value);
                    self.job_type = if job_type.is_empty() {
                        DEFAULT_JOB_TYPE.to_string()
                    } else {
                        job_type
                    };
                }
                "version" => self.version = string_field(value),
                "contributor" => self.contributor = string_field(value),
                "description" => self.description = string_field(value),
                "jobRetryCount" => self.job_retry_count = count_field(value),
                "prerequisites" => self.prerequisites = sequence_field(value),
                "parameters" => self.parameters = map_field(value),
                "taskRoles" => self.task_roles = map_field(value),
                "deployments" => {
                    self.deployments = sequence_field(value)
                        .iter()
                        .filter(|item| item.is_object())
                        .map(Deployment::from_value)
                        .collect();
                }
                "secrets" => self.secrets = map_field(value),
                "defaults" => self.defaults = map_field(value),
                "extras" => self.extras = map_field(value),
                _ => {}
            }
        }
    }
}

fn collect_prerequisites<R: TaskRoleSource>(task_roles: &[R]) -> Vec<Value> {
    let mut by_name = IndexMap::<String, Value>::new();
    for role in task_roles {
        let prerequisite = prune_empty(&role.docker_prerequisite());
        if is_empty_value(&prerequisite) {
            continue;
        }
        let name = string_field(prerequisite.get("name"));
        by_name.insert(name, prerequisite);
    }
    by_name.into_values().collect()
}

fn convert_task_roles<R: TaskRoleSource>(task_roles: &[R]) -> Map<String, Value> {
    task_roles
        .iter()
        .map(|role| (role.name().to_string(), role.to_protocol_format()))
        .collect()
}

fn string_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn count_field(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|count| u32::try_from(count).ok())
            .unwrap_or_default(),
        Some(Value::String(text)) => text.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

fn sequence_field(value: Option<&Value>) -> Vec<Value> {
    value
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn map_field(value: Option<&Value>) -> Map<String, Value> {
    value
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "protocol_test.rs"]
mod tests;
