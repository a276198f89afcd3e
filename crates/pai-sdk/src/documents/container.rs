use crate::secrets::{format_secret_reference, parse_secret_reference};
use chrono::{DateTime, Utc};
use pai_core::prune_empty_map;
use serde_json::{Map, Value};

pub const DOCKER_IMAGE_PREREQUISITE_TYPE: &str = "dockerimage";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerFields {
    pub name: String,
    pub uri: String,
    pub auth: Map<String, Value>,
    pub secret_ref: String,
}

/// A container image prerequisite. `auth.password` holds the resolved secret in
/// memory; `secret_ref` remembers which secret it came from so the document only
/// ever carries the reference token.
#[derive(Debug, Clone)]
pub struct ContainerReference {
    pub name: String,
    pub uri: String,
    pub auth: Map<String, Value>,
    pub secret_ref: String,
    pub update_time: DateTime<Utc>,
}

impl ContainerReference {
    pub fn new(fields: ContainerFields) -> Self {
        Self {
            name: fields.name,
            uri: fields.uri,
            auth: fields.auth,
            secret_ref: fields.secret_ref,
            update_time: Utc::now(),
        }
    }

    pub fn from_document_form(raw: &Value, secrets: &Map<String, Value>) -> Self {
        let field = |key: &str| {
            raw.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let raw_auth = raw.get("auth").and_then(Value::as_object);

        let resolved = raw_auth.and_then(|auth| {
            let password = auth.get("password").and_then(Value::as_str)?;
            let key = parse_secret_reference(password)?;
            let secret = secrets.get(key)?;
            let mut resolved_auth = auth.clone();
            resolved_auth.insert("password".to_string(), secret.clone());
            Some((resolved_auth, key.to_string()))
        });
        let (auth, secret_ref) = resolved.unwrap_or_default();

        Self::new(ContainerFields {
            name: field("name"),
            uri: field("uri"),
            auth,
            secret_ref,
        })
    }

    pub fn to_document_form(&self) -> Value {
        let mut auth = self.auth.clone();
        if !self.secret_ref.is_empty() {
            auth.insert(
                "password".to_string(),
                Value::String(format_secret_reference(&self.secret_ref)),
            );
        }

        let mut form = Map::new();
        form.insert(
            "type".to_string(),
            Value::String(DOCKER_IMAGE_PREREQUISITE_TYPE.to_string()),
        );
        form.insert("auth".to_string(), Value::Object(auth));
        form.insert("uri".to_string(), Value::String(self.uri.clone()));
        form.insert("name".to_string(), Value::String(self.name.clone()));
        Value::Object(prune_empty_map(&form))
    }

    pub fn password(&self) -> Option<&Value> {
        self.auth.get("password")
    }
}

impl Default for ContainerReference {
    fn default() -> Self {
        Self::new(ContainerFields::default())
    }
}

// update_time is informational and does not take part in equality.
impl PartialEq for ContainerReference {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.uri == other.uri
            && self.auth == other.auth
            && self.secret_ref == other.secret_ref
    }
}

#[cfg(test)]
#[path = "container_test.rs"]
mod tests;
