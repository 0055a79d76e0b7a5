//! List command implementation.

use crate::cli::ListArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use lexintake_domain::traits::DocumentStore;
use lexintake_store::RemoteStore;

/// Execute the list command.
pub async fn execute_list(args: ListArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = RemoteStore::new(config.store.store_config())?;
    let set = store.load().await?.unwrap_or_default();

    println!("{}", formatter.format_records(&set, args.limit)?);
    Ok(())
}
