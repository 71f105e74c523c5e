//! Credential artifact loading for the remote sink.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::StartupError;

/// Pre-validated credentials for the collection sink.
///
/// Loaded once at startup from a JSON artifact; a missing or malformed
/// artifact is the only fatal error in the process.
#[derive(Clone, Deserialize)]
pub struct SinkCredentials {
    /// Base URL of the sink API.
    pub endpoint: String,
    /// Project the collections live under.
    pub project: String,
    /// Bearer token authenticating this agent.
    pub token: String,
}

impl SinkCredentials {
    /// Load credentials from the artifact at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the artifact if it is absent or unparseable.
    pub fn load(path: &Path) -> Result<Self, StartupError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StartupError::MissingCredentials {
                    path: path.display().to_string(),
                }
            } else {
                StartupError::InvalidCredentials {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let credentials: Self =
            serde_json::from_str(&raw).map_err(|e| StartupError::InvalidCredentials {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if credentials.endpoint.is_empty() || credentials.token.is_empty() {
            return Err(StartupError::InvalidCredentials {
                path: path.display().to_string(),
                reason: "endpoint and token must be non-empty".to_string(),
            });
        }

        Ok(credentials)
    }
}

// The token never appears in logs.
impl fmt::Debug for SinkCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkCredentials")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_artifact() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("serviceAccountKey.json");
        fs::write(
            &path,
            r#"{"endpoint": "https://sink.example.com", "project": "camp-board", "token": "tok_123"}"#,
        )
        .unwrap();

        let credentials = SinkCredentials::load(&path).unwrap();
        assert_eq!(credentials.endpoint, "https://sink.example.com");
        assert_eq!(credentials.project, "camp-board");
        assert_eq!(credentials.token, "tok_123");
    }

    #[test]
    fn test_load_missing_artifact() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("serviceAccountKey.json");

        let err = SinkCredentials::load(&path).unwrap_err();
        assert!(matches!(err, StartupError::MissingCredentials { .. }));
        assert!(err.to_string().contains("serviceAccountKey.json"));
    }

    #[test]
    fn test_load_malformed_artifact() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("serviceAccountKey.json");
        fs::write(&path, "not json").unwrap();

        let err = SinkCredentials::load(&path).unwrap_err();
        assert!(matches!(err, StartupError::InvalidCredentials { .. }));
    }

    #[test]
    fn test_load_rejects_empty_token() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("serviceAccountKey.json");
        fs::write(
            &path,
            r#"{"endpoint": "https://sink.example.com", "project": "p", "token": ""}"#,
        )
        .unwrap();

        let err = SinkCredentials::load(&path).unwrap_err();
        assert!(matches!(err, StartupError::InvalidCredentials { .. }));
    }

    #[test]
    fn test_debug_redacts_token() {
        let credentials = SinkCredentials {
            endpoint: "https://sink.example.com".to_string(),
            project: "p".to_string(),
            token: "tok_secret".to_string(),
        };

        let debug = format!("{credentials:?}");
        assert!(!debug.contains("tok_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
