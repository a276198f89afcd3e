mod basic_info;
mod task_role;

use serde_json::{Map, Value};

pub use basic_info::JobBasicInfo;
pub use task_role::{roles_from_document, Completion, JobTaskRole, ResourcePerInstance};

/// Editor view of one task role, as consumed by `ProtocolDocument::derive_updated`.
pub trait TaskRoleSource {
    fn name(&self) -> &str;

    /// The role's container image in prerequisite form (`type: dockerimage`).
    fn docker_prerequisite(&self) -> Value;

    /// The role's fragment of the default deployment, if it overrides anything.
    fn deployment(&self) -> Option<Value>;

    /// The role definition stored under `taskRoles.<name>`.
    fn to_protocol_format(&self) -> Value;
}

/// Editor view of the job-level fields.
pub trait BasicInfoSource {
    fn defaults(&self) -> Map<String, Value>;

    fn to_protocol_format(&self) -> Map<String, Value>;
}

impl<T: TaskRoleSource + ?Sized> TaskRoleSource for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn docker_prerequisite(&self) -> Value {
        (**self).docker_prerequisite()
    }

    fn deployment(&self) -> Option<Value> {
        (**self).deployment()
    }

    fn to_protocol_format(&self) -> Value {
        (**self).to_protocol_format()
    }
}

impl<T: TaskRoleSource + ?Sized> TaskRoleSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn docker_prerequisite(&self) -> Value {
        (**self).docker_prerequisite()
    }

    fn deployment(&self) -> Option<Value> {
        (**self).deployment()
    }

    fn to_protocol_format(&self) -> Value {
        (**self).to_protocol_format()
    }
}
