use pai_core::StructuredIssue;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("protocol parse failed:\n{}", StructuredIssue::render_lines(.0))]
    Parse(Vec<StructuredIssue>),
    #[error("protocol yaml serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("protocol json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProtocolError {
    pub fn issues(&self) -> &[StructuredIssue] {
        match self {
            ProtocolError::Parse(issues) => issues,
            ProtocolError::Yaml(_) | ProtocolError::Json(_) => &[],
        }
    }
}
