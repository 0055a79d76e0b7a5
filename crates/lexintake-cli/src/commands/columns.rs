//! Columns command implementation.

use crate::cli::ColumnsArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lexintake_domain::traits::DocumentStore;
use lexintake_store::RemoteStore;

/// Execute the columns command.
pub async fn execute_columns(
    args: ColumnsArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let store = RemoteStore::new(config.store.store_config())?;
    let mut set = store.load().await?.unwrap_or_default();

    if let Some(indices) = args.move_indices {
        let (from, to) = (indices[0], indices[1]);
        if !set.move_column(from, to) {
            return Err(CliError::InvalidInput(format!(
                "Column index out of range (have {} columns)",
                set.column_order.len()
            )));
        }
        store.save(&set).await?;
        println!(
            "{}",
            formatter.success(&format!("Moved column {} to position {}", from, to))
        );
    }

    println!("{}", formatter.format_columns(&set)?);
    Ok(())
}
