use anyhow::{Result, bail};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_iam::config::Credentials;
use tracing::{debug, info};

use crate::{config::CredentialSpec, constants::DEFAULT_AWS_REGION};

/// Which authentication branch a playbook resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    StaticWithToken {
        access_key: String,
        secret_key: String,
        session_token: String,
    },
    Profile(String),
    Static {
        access_key: String,
        secret_key: String,
    },
}

impl CredentialSource {
    /// Selection precedence: a non-empty session token wins, then a non-empty
    /// profile name, then the static key pair. An unusable spec is rejected
    /// here instead of surfacing as an authentication failure at the first
    /// remote call.
    pub fn from_spec(spec: &CredentialSpec) -> Result<Self> {
        if let Some(session_token) = non_empty(&spec.session_token) {
            let (access_key, secret_key) = static_pair(spec)?;
            return Ok(Self::StaticWithToken {
                access_key,
                secret_key,
                session_token: session_token.to_string(),
            });
        }

        if let Some(profile) = non_empty(&spec.profile_name) {
            return Ok(Self::Profile(profile.to_string()));
        }

        let (access_key, secret_key) = static_pair(spec)?;
        Ok(Self::Static {
            access_key,
            secret_key,
        })
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::StaticWithToken { .. } => "static access key with session token",
            Self::Profile(_) => "shared profile",
            Self::Static { .. } => "static access key",
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn static_pair(spec: &CredentialSpec) -> Result<(String, String)> {
    match (non_empty(&spec.access_key), non_empty(&spec.secret_key)) {
        (Some(access_key), Some(secret_key)) => {
            Ok((access_key.to_string(), secret_key.to_string()))
        }
        _ => bail!(
            "Playbook credentials need either a profile_name or both access_key and secret_key"
        ),
    }
}

/// Build an authenticated SDK config from the playbook credentials
pub async fn load(spec: &CredentialSpec) -> Result<SdkConfig> {
    let source = CredentialSource::from_spec(spec)?;
    let region = Region::new(
        spec.region
            .clone()
            .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
    );
    info!("Using region: {}", region);

    let config = match source {
        CredentialSource::StaticWithToken {
            access_key,
            secret_key,
            session_token,
        } => {
            debug!("Authenticating with static credentials and session token");
            aws_config::defaults(BehaviorVersion::latest())
                .credentials_provider(Credentials::new(
                    access_key,
                    secret_key,
                    Some(session_token),
                    None,
                    "playbook",
                ))
                .region(region)
                .load()
                .await
        }
        CredentialSource::Profile(profile) => {
            debug!("Authenticating with shared profile: {}", profile);
            aws_config::defaults(BehaviorVersion::latest())
                .profile_name(&profile)
                .region(region)
                .load()
                .await
        }
        CredentialSource::Static {
            access_key,
            secret_key,
        } => {
            debug!("Authenticating with static credentials");
            aws_config::defaults(BehaviorVersion::latest())
                .credentials_provider(Credentials::new(
                    access_key, secret_key, None, None, "playbook",
                ))
                .region(region)
                .load()
                .await
        }
    };

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(
        access_key: Option<&str>,
        secret_key: Option<&str>,
        session_token: Option<&str>,
        profile_name: Option<&str>,
    ) -> CredentialSpec {
        CredentialSpec {
            access_key: access_key.map(String::from),
            secret_key: secret_key.map(String::from),
            session_token: session_token.map(String::from),
            profile_name: profile_name.map(String::from),
            region: None,
        }
    }

    #[test]
    fn test_token_branch_wins_over_profile() {
        let source =
            CredentialSource::from_spec(&spec(Some("A"), Some("B"), Some("T"), Some("prod")))
                .unwrap();

        assert_eq!(
            source,
            CredentialSource::StaticWithToken {
                access_key: "A".to_string(),
                secret_key: "B".to_string(),
                session_token: "T".to_string(),
            }
        );
    }

    #[test]
    fn test_profile_branch_wins_over_static() {
        let source =
            CredentialSource::from_spec(&spec(Some("A"), Some("B"), None, Some("prod"))).unwrap();
        assert_eq!(source, CredentialSource::Profile("prod".to_string()));
    }

    #[test]
    fn test_static_branch_is_the_fallback() {
        let source = CredentialSource::from_spec(&spec(Some("A"), Some("B"), None, None)).unwrap();
        assert_eq!(
            source,
            CredentialSource::Static {
                access_key: "A".to_string(),
                secret_key: "B".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let source =
            CredentialSource::from_spec(&spec(Some("A"), Some("B"), Some(""), None)).unwrap();
        assert!(matches!(source, CredentialSource::Static { .. }));
    }

    #[test]
    fn test_empty_profile_is_ignored() {
        let source =
            CredentialSource::from_spec(&spec(Some("A"), Some("B"), None, Some(""))).unwrap();
        assert!(matches!(source, CredentialSource::Static { .. }));
    }

    #[test]
    fn test_unusable_spec_is_rejected() {
        let result = CredentialSource::from_spec(&spec(None, None, None, None));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("profile_name"));
    }

    #[test]
    fn test_token_without_key_pair_is_rejected() {
        let result = CredentialSource::from_spec(&spec(None, None, Some("T"), None));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_secret_key_is_rejected() {
        let result = CredentialSource::from_spec(&spec(Some("A"), None, None, None));
        assert!(result.is_err());
    }
}
