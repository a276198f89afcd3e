use super::BasicInfoSource;
use crate::documents::ProtocolDocument;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobBasicInfo {
    pub name: String,
    pub job_retry_count: u32,
    pub virtual_cluster: String,
    pub default_deployment: String,
    pub description: String,
    pub contributor: String,
}

impl JobBasicInfo {
    pub fn from_protocol(document: &ProtocolDocument) -> Self {
        let default_field = |key: &str| {
            document
                .defaults
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            name: document.name.clone(),
            job_retry_count: document.job_retry_count,
            virtual_cluster: default_field("virtualCluster"),
            default_deployment: default_field("deployment"),
            description: document.description.clone(),
            contributor: document.contributor.clone(),
        }
    }
}

impl BasicInfoSource for JobBasicInfo {
    fn defaults(&self) -> Map<String, Value> {
        let mut defaults = Map::new();
        defaults.insert(
            "virtualCluster".to_string(),
            Value::String(self.virtual_cluster.clone()),
        );
        defaults.insert(
            "deployment".to_string(),
            Value::String(self.default_deployment.clone()),
        );
        defaults
    }

    fn to_protocol_format(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(self.name.clone()));
        fields.insert(
            "jobRetryCount".to_string(),
            Value::from(self.job_retry_count),
        );
        // Left out when blank so an editor without these inputs keeps the document's values.
        if !self.description.is_empty() {
            fields.insert(
                "description".to_string(),
                Value::String(self.description.clone()),
            );
        }
        if !self.contributor.is_empty() {
            fields.insert(
                "contributor".to_string(),
                Value::String(self.contributor.clone()),
            );
        }
        fields
    }
}

#[cfg(test)]
#[path = "basic_info_test.rs"]
mod tests;
