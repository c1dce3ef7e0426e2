pub mod prompt;

use std::fmt;

/// Environment variables for non-interactive use (CI, scripts).
pub const ENV_USERNAME_VAR: &str = "MATCHPOINT_USERNAME";
pub const ENV_PASSWORD_VAR: &str = "MATCHPOINT_PASSWORD";

pub use prompt::{prompt_for_credentials, reprompt_for_credentials, resolve_credentials};

/// The session object: a Basic Auth username/password pair held in memory
/// for the lifetime of the process and passed explicitly to the API client.
/// Nothing is written to disk.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

fn env_var_nonempty(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

/// Read the username from MATCHPOINT_USERNAME, if set and non-empty.
pub fn username_from_env() -> Option<String> {
    env_var_nonempty(ENV_USERNAME_VAR)
}

/// Read the password from MATCHPOINT_PASSWORD, if set and non-empty.
pub fn password_from_env() -> Option<String> {
    env_var_nonempty(ENV_PASSWORD_VAR)
}

#[derive(Debug)]
pub enum CredentialError {
    EmptyUsername,
    EmptyPassword,
    ReadFailed(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::EmptyUsername => write!(f, "Username cannot be empty"),
            CredentialError::EmptyPassword => write!(f, "Password cannot be empty"),
            CredentialError::ReadFailed(msg) => write!(f, "Failed to read credentials: {}", msg),
        }
    }
}

impl std::error::Error for CredentialError {}
