pub mod documents;
pub mod edits;
pub mod error;
pub mod parse;
pub mod roles;
pub mod secrets;
pub mod validate;

pub use documents::{
    ContainerFields, ContainerReference, Deployment, ProtocolDocument, DEFAULT_DEPLOYMENT_NAME,
    DOCKER_IMAGE_PREREQUISITE_TYPE,
};
pub use edits::{
    apply_key_value_edits, edits_from_mapping, parse_assignment, reduce_key_value_edits,
    KeyValueEdit,
};
pub use error::ProtocolError;
pub use parse::{parse_yaml_mapping, parse_yaml_value};
pub use roles::{
    roles_from_document, BasicInfoSource, Completion, JobBasicInfo, JobTaskRole,
    ResourcePerInstance, TaskRoleSource,
};
pub use secrets::{format_secret_reference, parse_secret_reference};
pub use validate::{validate_protocol_text, validate_protocol_value};
