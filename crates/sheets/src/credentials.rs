use std::path::Path;

use base64::Engine as _;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable carrying a base64-encoded authorized-user token
/// blob, for deployments without a token file on disk.
pub const TOKEN_ENV_VAR: &str = "DEALFLOW_SHEETS_TOKEN_B64";

/// The credential artifact produced by the one-time interactive
/// authorization flow (an authorized-user `token.json`). How the token
/// is obtained or refreshed is outside this system; the store only needs
/// a valid bearer token.
#[derive(Clone, Debug)]
pub struct SheetsCredentials {
    access_token: SecretString,
}

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("could not read token file `{path}`: {source}")]
    ReadFile { path: String, source: std::io::Error },
    #[error("could not decode {TOKEN_ENV_VAR}: {0}")]
    Decode(base64::DecodeError),
    #[error("{TOKEN_ENV_VAR} is not valid UTF-8")]
    Utf8,
    #[error("token blob is not valid JSON: {0}")]
    Parse(serde_json::Error),
    #[error("token blob has no `token` field - re-run the authorization flow")]
    MissingToken,
}

#[derive(Deserialize)]
struct TokenFile {
    token: Option<String>,
    // Present in authorized-user files; unused here because refresh is
    // part of the out-of-scope bootstrap flow.
    #[serde(default)]
    #[allow(dead_code)]
    refresh_token: Option<String>,
}

impl SheetsCredentials {
    /// Environment blob first (for deployment), token file second (for
    /// local use).
    pub fn load(token_path: &Path) -> Result<Self, CredentialsError> {
        if let Ok(blob) = std::env::var(TOKEN_ENV_VAR) {
            if !blob.trim().is_empty() {
                return Self::from_base64(blob.trim());
            }
        }
        Self::from_file(token_path)
    }

    pub fn from_file(path: &Path) -> Result<Self, CredentialsError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CredentialsError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_base64(blob: &str) -> Result<Self, CredentialsError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(blob)
            .map_err(CredentialsError::Decode)?;
        let raw = String::from_utf8(bytes).map_err(|_| CredentialsError::Utf8)?;
        Self::from_json(&raw)
    }

    fn from_json(raw: &str) -> Result<Self, CredentialsError> {
        let parsed: TokenFile = serde_json::from_str(raw).map_err(CredentialsError::Parse)?;
        let token = parsed
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or(CredentialsError::MissingToken)?;
        Ok(Self { access_token: token.into() })
    }

    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }
}
