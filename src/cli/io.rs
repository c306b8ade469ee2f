use dialoguer::{theme::ColorfulTheme, Confirm};

use super::CliError;

/// Asks for confirmation unless `assume_yes` is set.
pub fn confirm_action(prompt: &str, assume_yes: bool) -> Result<bool, CliError> {
    if assume_yes {
        return Ok(true);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(CliError::from)
}
