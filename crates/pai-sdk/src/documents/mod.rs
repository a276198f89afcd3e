mod container;
mod protocol;

pub use container::{ContainerFields, ContainerReference, DOCKER_IMAGE_PREREQUISITE_TYPE};
pub use protocol::{Deployment, ProtocolDocument, DEFAULT_DEPLOYMENT_NAME};
