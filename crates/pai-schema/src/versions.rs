pub const SCHEMA_JOB_PROTOCOL_2: &str = "job-protocol/2";

/// Value of `protocolVersion` written into every document this workspace builds.
pub const JOB_PROTOCOL_VERSION: u64 = 2;
