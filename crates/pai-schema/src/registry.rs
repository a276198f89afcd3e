use crate::embedded::EmbeddedSchema;
use crate::versions::SCHEMA_JOB_PROTOCOL_2;

const JOB_PROTOCOL_SCHEMA: &str = include_str!("../schemas/job-protocol-v2.schema.json");

pub fn get_json_schema(schema_id: &str) -> Option<EmbeddedSchema> {
    match schema_id {
        SCHEMA_JOB_PROTOCOL_2 => Some(EmbeddedSchema {
            id: SCHEMA_JOB_PROTOCOL_2,
            json: JOB_PROTOCOL_SCHEMA,
        }),
        _ => None,
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
