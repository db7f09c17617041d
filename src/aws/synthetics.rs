use anyhow::{Context, Result};
use aws_sdk_synthetics::Client as SyntheticsClient;
use aws_sdk_synthetics::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_synthetics::operation::create_canary::CreateCanaryError;
use aws_sdk_synthetics::primitives::Blob;
use aws_sdk_synthetics::types::{CanaryCodeInput, CanaryRunConfigInput, CanaryScheduleInput};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::CanarySpec;
use crate::constants::{
    CANARY_CREATE_INITIAL_DELAY, CANARY_CREATE_MAX_ATTEMPTS, CANARY_CREATE_MAX_DELAY,
    FAILURE_RETENTION_DAYS, SUCCESS_RETENTION_DAYS,
};

/// Create the canary referencing the freshly provisioned role.
///
/// IAM is eventually consistent: for a short window after CreateRole the
/// monitoring service rejects the role as not assumable. Instead of sleeping a
/// fixed duration, CreateCanary is retried with exponential backoff while the
/// rejection still looks like propagation; every other failure (including a
/// name collision with an existing canary) propagates immediately.
pub async fn create_canary(
    client: &SyntheticsClient,
    spec: &CanarySpec,
    archive: Vec<u8>,
    role_arn: &str,
    name: &str,
) -> Result<()> {
    let code = CanaryCodeInput::builder()
        .zip_file(Blob::new(archive))
        .handler(&spec.handler)
        .build();

    let schedule = CanaryScheduleInput::builder()
        .expression(&spec.expression)
        .duration_in_seconds(spec.duration_in_seconds)
        .build()
        .context("Invalid canary schedule")?;

    let run_config = CanaryRunConfigInput::builder()
        .timeout_in_seconds(spec.timeout)
        .memory_in_mb(spec.memory_in_mb)
        .active_tracing(false)
        .set_environment_variables(Some(spec.environment_variables.clone()))
        .build();

    let mut attempt = 1u32;
    let mut delay = CANARY_CREATE_INITIAL_DELAY;
    loop {
        let result = client
            .create_canary()
            .name(name)
            .code(code.clone())
            .artifact_s3_location(&spec.artifact_location)
            .execution_role_arn(role_arn)
            .schedule(schedule.clone())
            .run_config(run_config.clone())
            .success_retention_period_in_days(SUCCESS_RETENTION_DAYS)
            .failure_retention_period_in_days(FAILURE_RETENTION_DAYS)
            .runtime_version(&spec.runtime_version)
            .send()
            .await;

        match result {
            Ok(_) => {
                info!("Canary {} created with role {}", name, role_arn);
                return Ok(());
            }
            Err(err)
                if attempt < CANARY_CREATE_MAX_ATTEMPTS && is_role_propagation_error(&err) =>
            {
                warn!(
                    "Execution role not yet usable (attempt {}/{}), retrying in {:?}",
                    attempt, CANARY_CREATE_MAX_ATTEMPTS, delay
                );
                sleep(delay).await;
                attempt += 1;
                delay = (delay * 2).min(CANARY_CREATE_MAX_DELAY);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to create canary {name}"));
            }
        }
    }
}

fn is_role_propagation_error(err: &SdkError<CreateCanaryError>) -> bool {
    err.as_service_error()
        .is_some_and(|service| looks_like_role_propagation(service.code(), service.message()))
}

/// An unpropagated role surfaces as access-denied or a validation error
/// complaining about the role
fn looks_like_role_propagation(code: Option<&str>, message: Option<&str>) -> bool {
    match code {
        Some("AccessDeniedException") => true,
        Some("ValidationException") => {
            let message = message.unwrap_or_default().to_ascii_lowercase();
            message.contains("role") || message.contains("assume")
        }
        _ => false,
    }
}
