//! Deployment configuration.
//!
//! The messaging vendor ships a JSON deployment file alongside the app; this
//! module reads the subset the conversation core cares about.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ParleyError, Result};

/// Deployment settings read from the vendor's config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Service endpoint base URL.
    #[serde(rename = "scrt_url")]
    pub service_url: String,
    /// Whether the endpoint requires user verification.
    #[serde(default)]
    pub user_verification_required: bool,
}

impl DeploymentConfig {
    /// Loads the deployment config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ParleyError::Config`] if the file cannot be read and a
    /// serialization error if it holds invalid JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ParleyError::config(format!(
                "unable to read deployment config {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_deployment_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"scrt_url": "https://example.my.salesforce-scrt.com", "user_verification_required": true}}"#
        )
        .unwrap();

        let config = DeploymentConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.service_url, "https://example.my.salesforce-scrt.com");
        assert!(config.user_verification_required);
    }

    #[test]
    fn test_user_verification_defaults_to_false() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"scrt_url": "https://example.test"}}"#).unwrap();

        let config = DeploymentConfig::from_json_file(file.path()).unwrap();
        assert!(!config.user_verification_required);
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let err = DeploymentConfig::from_json_file("/nonexistent/configFile.json").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_json_is_a_serialization_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = DeploymentConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ParleyError::Serialization { .. }));
    }
}
