use super::TaskRoleSource;
use crate::documents::{ContainerFields, ContainerReference, ProtocolDocument};
use pai_core::{is_empty_value, prune_empty, prune_empty_map};
use serde_json::{Map, Value};

const DEFAULT_INSTANCES: u32 = 1;

/// Keys of a role definition that `JobTaskRole` models; everything else is kept in `extra`.
const MODELED_KEYS: &[&str] = &[
    "instances",
    "completion",
    "taskRetryCount",
    "dockerImage",
    "resourcePerInstance",
    "extraContainerOptions",
    "commands",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completion {
    pub min_failed_instances: Option<i64>,
    pub min_succeeded_instances: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourcePerInstance {
    pub cpu: Option<u32>,
    pub memory_mb: Option<u32>,
    pub gpu: Option<u32>,
    pub ports: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobTaskRole {
    pub name: String,
    pub instances: u32,
    pub completion: Completion,
    pub task_retry_count: u32,
    pub container: ContainerReference,
    pub resources: ResourcePerInstance,
    pub shm_mb: Option<u32>,
    /// `extraContainerOptions` other than `shmMB`.
    pub container_options: Map<String, Value>,
    pub commands: Vec<String>,
    pub pre_commands: Vec<String>,
    pub post_commands: Vec<String>,
    pub extra: Map<String, Value>,
}

impl JobTaskRole {
    pub fn new(name: impl Into<String>, container: ContainerReference) -> Self {
        Self {
            name: name.into(),
            instances: DEFAULT_INSTANCES,
            completion: Completion::default(),
            task_retry_count: 0,
            container,
            resources: ResourcePerInstance::default(),
            shm_mb: None,
            container_options: Map::new(),
            commands: Vec::new(),
            pre_commands: Vec::new(),
            post_commands: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Reads `taskRoles.<name>` of a parsed document. The role's image is looked
    /// up among the prerequisites and its secret reference resolved against the
    /// document's secrets.
    pub fn from_protocol(name: &str, role: &Value, document: &ProtocolDocument) -> Self {
        let image_name = role
            .get("dockerImage")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let container = match document.find_prerequisite(image_name) {
            Some(prerequisite) => {
                ContainerReference::from_document_form(prerequisite, &document.secrets)
            }
            None => ContainerReference::new(ContainerFields {
                name: image_name.to_string(),
                ..ContainerFields::default()
            }),
        };

        let completion = role.get("completion");
        let container_options = role.get("extraContainerOptions");
        let resources = role.get("resourcePerInstance");
        let deployment = document
            .default_deployment()
            .and_then(|deployment| deployment.task_roles.get(name));

        let extra = role
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .filter(|(key, _)| !MODELED_KEYS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: name.to_string(),
            instances: count(role.get("instances")).unwrap_or(DEFAULT_INSTANCES),
            completion: Completion {
                min_failed_instances: completion
                    .and_then(|value| value.get("minFailedInstances"))
                    .and_then(Value::as_i64),
                min_succeeded_instances: completion
                    .and_then(|value| value.get("minSucceededInstances"))
                    .and_then(Value::as_i64),
            },
            task_retry_count: count(role.get("taskRetryCount")).unwrap_or_default(),
            container,
            resources: ResourcePerInstance {
                cpu: count(resources.and_then(|value| value.get("cpu"))),
                memory_mb: count(resources.and_then(|value| value.get("memoryMB"))),
                gpu: count(resources.and_then(|value| value.get("gpu"))),
                ports: resources
                    .and_then(|value| value.get("ports"))
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default(),
            },
            shm_mb: count(container_options.and_then(|value| value.get("shmMB"))),
            container_options: container_options
                .and_then(Value::as_object)
                .map(|object| {
                    object
                        .iter()
                        .filter(|(key, _)| key.as_str() != "shmMB")
                        .map(|(key, value)| (key.clone(), value.clone()))
                        .collect()
                })
                .unwrap_or_default(),
            commands: strings(role.get("commands")),
            pre_commands: strings(deployment.and_then(|value| value.get("preCommands"))),
            post_commands: strings(deployment.and_then(|value| value.get("postCommands"))),
            extra,
        }
    }
}

impl TaskRoleSource for JobTaskRole {
    fn name(&self) -> &str {
        &self.name
    }

    fn docker_prerequisite(&self) -> Value {
        self.container.to_document_form()
    }

    fn deployment(&self) -> Option<Value> {
        let mut fragment = Map::new();
        fragment.insert("preCommands".to_string(), string_array(&self.pre_commands));
        fragment.insert("postCommands".to_string(), string_array(&self.post_commands));
        let fragment = Value::Object(prune_empty_map(&fragment));
        (!is_empty_value(&fragment)).then_some(fragment)
    }

    fn to_protocol_format(&self) -> Value {
        let mut completion = Map::new();
        if let Some(min_failed) = self.completion.min_failed_instances {
            completion.insert("minFailedInstances".to_string(), Value::from(min_failed));
        }
        if let Some(min_succeeded) = self.completion.min_succeeded_instances {
            completion.insert(
                "minSucceededInstances".to_string(),
                Value::from(min_succeeded),
            );
        }

        let mut resources = Map::new();
        for (key, amount) in [
            ("cpu", self.resources.cpu),
            ("memoryMB", self.resources.memory_mb),
            ("gpu", self.resources.gpu),
        ] {
            if let Some(amount) = amount {
                resources.insert(key.to_string(), Value::from(amount));
            }
        }
        resources.insert(
            "ports".to_string(),
            Value::Object(self.resources.ports.clone()),
        );

        let mut container_options = self.container_options.clone();
        if let Some(shm_mb) = self.shm_mb {
            container_options.insert("shmMB".to_string(), Value::from(shm_mb));
        }

        let mut role = Map::new();
        role.insert("instances".to_string(), Value::from(self.instances));
        role.insert("completion".to_string(), Value::Object(completion));
        role.insert(
            "taskRetryCount".to_string(),
            Value::from(self.task_retry_count),
        );
        role.insert(
            "dockerImage".to_string(),
            Value::String(self.container.name.clone()),
        );
        role.insert("resourcePerInstance".to_string(), Value::Object(resources));
        role.insert(
            "extraContainerOptions".to_string(),
            Value::Object(container_options),
        );
        role.insert("commands".to_string(), string_array(&self.commands));
        for (key, value) in &self.extra {
            role.insert(key.clone(), value.clone());
        }
        prune_empty(&Value::Object(role))
    }
}

/// Editor views for every task role of a parsed document, in document order.
pub fn roles_from_document(document: &ProtocolDocument) -> Vec<JobTaskRole> {
    document
        .task_roles
        .iter()
        .map(|(name, role)| JobTaskRole::from_protocol(name, role, document))
        .collect()
}

fn count(value: Option<&Value>) -> Option<u32> {
    value
        .and_then(Value::as_u64)
        .and_then(|count| u32::try_from(count).ok())
}

fn strings(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

#[cfg(test)]
#[path = "task_role_test.rs"]
mod tests;
