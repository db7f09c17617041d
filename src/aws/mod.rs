use std::fmt;

use uuid::Uuid;

pub mod policy;
pub mod roles;
pub mod session;
pub mod synthetics;

/// Random identifier shared by every resource created in one invocation.
/// Role and policy names carry the same suffix so leftovers are easy to correlate.
#[derive(Debug, Clone)]
pub struct RunId(String);

impl RunId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Re-export commonly used types (functions should be accessed via module path)
pub use roles::ProvisionedRole;
pub use session::CredentialSource;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_is_simple_hex() {
        let id = RunId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_run_ids_are_distinct() {
        let a = RunId::generate();
        let b = RunId::generate();
        assert_ne!(a.as_str(), b.as_str());
    }
}
