//! Interactive setup wizard for first-time configuration
//!
//! Asks for the server address and an optional session cookie the first
//! time tagdrive runs without a config file.

use super::ClientConfig;
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::Path;

/// Interactive first-time setup
///
/// 1. Prompts for the server URL (default: `http://localhost:80`)
/// 2. Prompts for a session cookie (empty for none)
/// 3. Saves the configuration to `path`
///
/// # Errors
///
/// Returns `ConfigError` if user input cannot be read or the configuration
/// cannot be saved.
pub fn first_time_setup(path: &Path) -> Result<ClientConfig, ConfigError> {
    println!("Welcome to tagdrive! Let's connect to your drive.\n");

    let defaults = ClientConfig::default();

    let server_url: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Server URL")
        .default(defaults.server_url.clone())
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let cookie: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Session cookie (leave empty for none)")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let config = ClientConfig {
        server_url: server_url.trim().to_string(),
        cookie: Some(cookie.trim().to_string()).filter(|c| !c.is_empty()),
        ..defaults
    };

    config.save_to(path)?;

    println!("\nConfiguration saved to {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_signature() {
        let _: fn(&Path) -> Result<ClientConfig, ConfigError> = first_time_setup;
    }
}
