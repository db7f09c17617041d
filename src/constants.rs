use std::time::Duration;

/// Default AWS region when the playbook does not name one
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Prefix for generated execution role names
pub const ROLE_NAME_PREFIX: &str = "canary-synth-";

/// Prefix for generated permissions policy names
pub const POLICY_NAME_PREFIX: &str = "Policy-";

/// Days the monitoring service keeps artifacts of successful runs
pub const SUCCESS_RETENTION_DAYS: i32 = 30;

/// Days the monitoring service keeps artifacts of failed runs
pub const FAILURE_RETENTION_DAYS: i32 = 30;

/// Maximum CreateCanary attempts while the new role propagates through IAM
pub const CANARY_CREATE_MAX_ATTEMPTS: u32 = 6;

/// Delay before the first CreateCanary retry
pub const CANARY_CREATE_INITIAL_DELAY: Duration = Duration::from_secs(5);

/// Ceiling for the exponential retry delay
pub const CANARY_CREATE_MAX_DELAY: Duration = Duration::from_secs(30);
