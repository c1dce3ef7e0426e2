use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, Config, ServerConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("matchpoint configuration");
    println!("========================");
    println!();

    // 1. Server URL
    let base_url = loop {
        let input = prompt_with_default("Club API base URL", &ServerConfig::default().base_url)?;
        match reqwest::Url::parse(&input) {
            Ok(_) => break input,
            Err(e) => println!("  Invalid URL: {}. Try again.", e),
        }
    };

    // 2. Default account (reads are public, so this may stay empty)
    println!();
    println!("Write operations (adding players and matches, deleting) need a club");
    println!("account. The username can be stored here; the password never is.");
    let username_input = prompt("Default username (empty for none): ")?;
    let username = if username_input.is_empty() {
        None
    } else {
        Some(username_input)
    };

    // 3. Auto-refresh interval
    println!();
    let auto_refresh_interval: u64 = loop {
        let input = prompt_with_default("TUI auto-refresh interval in seconds", "300")?;
        match input.parse::<u64>() {
            Ok(v) if v >= 5 => break v,
            Ok(_) => println!("  Too short: use at least 5 seconds."),
            Err(_) => println!("  Invalid: must be a whole number of seconds. Try again."),
        }
    };

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        server: ServerConfig { base_url },
        username,
        auto_refresh_interval,
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `matchpoint` to open the club view.");

    Ok(())
}
