//! Check command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use lexintake_assistant::RemoteAssistant;

/// Execute the check command: verify the configured assistant exists before
/// the first batch is submitted.
pub async fn execute_check(config: &Config, formatter: &Formatter) -> Result<()> {
    let assistant = RemoteAssistant::new(config.assistant.assistant_config())?;
    let id = assistant.retrieve_assistant().await?;

    println!(
        "{}",
        formatter.success(&format!("Assistant {} is reachable", id))
    );
    Ok(())
}
