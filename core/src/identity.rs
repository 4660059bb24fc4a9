use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GoalError;

const ANONYMOUS_UID_FILE: &str = "anonymous_uid";

/// Opaque identifier handed out by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait IdentityProvider {
    fn sign_in(&self) -> Result<UserId, GoalError>;
}

/// Signs in with a custom token when one is configured, otherwise anonymously
/// with an id generated once and kept in the data directory.
pub struct LocalIdentityProvider {
    data_dir: PathBuf,
    auth_token: Option<String>,
}

impl LocalIdentityProvider {
    pub fn new(data_dir: PathBuf, auth_token: Option<String>) -> Self {
        Self { data_dir, auth_token }
    }

    fn sign_in_with_token(&self, token: &str) -> Result<UserId, GoalError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(GoalError::Auth("custom token is empty".to_string()));
        }
        validate_user_id(token)?;
        Ok(UserId::new(token))
    }

    fn sign_in_anonymously(&self) -> Result<UserId, GoalError> {
        let path = self.data_dir.join(ANONYMOUS_UID_FILE);
        if path.exists() {
            let stored = fs::read_to_string(&path)
                .map_err(|e| GoalError::Auth(format!("cannot read {}: {}", path.display(), e)))?;
            let stored = stored.trim();
            validate_user_id(stored)?;
            return Ok(UserId::new(stored));
        }

        let id = Uuid::new_v4().to_string();
        fs::create_dir_all(&self.data_dir)
            .and_then(|_| fs::write(&path, &id))
            .map_err(|e| GoalError::Auth(format!("cannot write {}: {}", path.display(), e)))?;
        tracing::info!(user = %id, "created anonymous identity");
        Ok(UserId::new(id))
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn sign_in(&self) -> Result<UserId, GoalError> {
        match &self.auth_token {
            Some(token) => self.sign_in_with_token(token),
            None => self.sign_in_anonymously(),
        }
    }
}

// The id becomes a path segment in the record store.
fn validate_user_id(id: &str) -> Result<(), GoalError> {
    let ok = !id.is_empty()
        && id != "."
        && id != ".."
        && id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if ok {
        Ok(())
    } else {
        Err(GoalError::Auth(format!("'{}' is not a usable user id", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_token_sign_in() {
        let dir = TempDir::new().unwrap();
        let provider = LocalIdentityProvider::new(dir.path().to_path_buf(), Some(" user-42 ".to_string()));
        assert_eq!(provider.sign_in().unwrap(), UserId::new("user-42"));
    }

    #[test]
    fn test_bad_tokens_are_auth_errors() {
        let dir = TempDir::new().unwrap();
        for token in ["", "   ", "../escape", "a/b"] {
            let provider = LocalIdentityProvider::new(dir.path().to_path_buf(), Some(token.to_string()));
            assert!(matches!(provider.sign_in(), Err(GoalError::Auth(_))), "{:?}", token);
        }
    }

    #[test]
    fn test_anonymous_id_is_stable() {
        let dir = TempDir::new().unwrap();
        let provider = LocalIdentityProvider::new(dir.path().join("nested"), None);

        let first = provider.sign_in().unwrap();
        let second = provider.sign_in().unwrap();
        assert_eq!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }

    #[test]
    fn test_corrupt_anonymous_id_is_auth_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(ANONYMOUS_UID_FILE), "not/valid").unwrap();
        let provider = LocalIdentityProvider::new(dir.path().to_path_buf(), None);
        assert!(matches!(provider.sign_in(), Err(GoalError::Auth(_))));
    }
}
