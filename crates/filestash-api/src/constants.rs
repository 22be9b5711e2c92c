/// Service name reported in logs.
pub const SERVICE_NAME: &str = "filestash-api";

pub const FILES_PATH: &str = "/files";
pub const FILE_PATH: &str = "/files/{id}";
pub const INSTANCE_DELETED_PATH: &str = "/events/instance-deleted";
pub const HEALTH_PATH: &str = "/health";
