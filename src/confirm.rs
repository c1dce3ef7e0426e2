use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Capability for asking the user to confirm a destructive action.
/// Injected so delete flows stay testable and scriptable (`--yes`).
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Asks on the terminal, defaulting to "no".
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        print!("{} [y/N]: ", prompt);
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut input)
            .context("Failed to read confirmation")?;

        let input = input.trim().to_lowercase();
        Ok(input == "y" || input == "yes")
    }
}

/// Confirms everything; backs the `--yes` flag.
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}
