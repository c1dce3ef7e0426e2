use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use super::{password_from_env, username_from_env, CredentialError, Credentials};

fn prompt_username() -> Result<String, CredentialError> {
    print!("Username: ");
    std::io::stdout()
        .flush()
        .map_err(|e| CredentialError::ReadFailed(e.to_string()))?;

    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .map_err(|e| CredentialError::ReadFailed(e.to_string()))?;

    let username = input.trim().to_string();
    if username.is_empty() {
        return Err(CredentialError::EmptyUsername);
    }
    Ok(username)
}

fn prompt_password(username: &str) -> Result<String, CredentialError> {
    let password = rpassword::prompt_password(format!("Password for {}: ", username))
        .map_err(|e| CredentialError::ReadFailed(e.to_string()))?;

    let password = password.trim().to_string();
    if password.is_empty() {
        return Err(CredentialError::EmptyPassword);
    }
    Ok(password)
}

/// Interactively prompt for a username/password pair. A known username
/// (from --user or the config file) skips the username prompt.
pub fn prompt_for_credentials(known_username: Option<&str>) -> Result<Credentials> {
    println!("This operation needs a club account (reads are public, writes are not).");

    let username = match known_username {
        Some(u) => u.to_string(),
        None => prompt_username().context("Failed to read username")?,
    };
    let password = prompt_password(&username).context("Failed to read password")?;

    Ok(Credentials::new(username, password))
}

/// Re-prompt after the server rejected the credentials.
pub fn reprompt_for_credentials(previous_username: &str) -> Result<Credentials> {
    eprintln!();
    eprintln!("The server rejected the credentials for '{}'.", previous_username);
    eprintln!("Try again.");
    eprintln!();

    prompt_for_credentials(None)
}

/// Build credentials from the first source that provides them:
/// environment variables, then an interactive prompt. `known_username`
/// (CLI flag or config file) pre-fills the username either way.
pub fn resolve_credentials(known_username: Option<&str>) -> Result<Credentials> {
    let username = known_username
        .map(str::to_string)
        .or_else(username_from_env);

    if let (Some(username), Some(password)) = (username.clone(), password_from_env()) {
        return Ok(Credentials::new(username, password));
    }

    prompt_for_credentials(username.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_hold_the_pair() {
        let creds = Credentials::new("admin", "secret");
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn test_error_messages() {
        assert!(CredentialError::EmptyUsername.to_string().contains("Username"));
        assert!(CredentialError::EmptyPassword.to_string().contains("Password"));
        assert!(CredentialError::ReadFailed("eof".into())
            .to_string()
            .contains("eof"));
    }
}
