pub mod embedded;
pub mod registry;
pub mod validate;
pub mod versions;

pub use embedded::EmbeddedSchema;
pub use registry::get_json_schema;
pub use validate::validate_schema_instance;
