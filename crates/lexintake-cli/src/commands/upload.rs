//! Upload command implementation.

use crate::cli::UploadArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lexintake_assistant::RemoteAssistant;
use lexintake_domain::batch::BatchState;
use lexintake_domain::traits::{AssistantJobs, BlobStore, DocumentStore};
use lexintake_extractor::ExtractionClient;
use lexintake_intake::{EventSink, IntakeController, IntakeEvent};
use lexintake_store::{RemoteBlobStore, RemoteStore};
use std::fmt::Display;
use std::fs;

/// Execute the upload command.
pub async fn execute_upload(
    args: UploadArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                CliError::InvalidInput(format!("Invalid file path: {}", path.display()))
            })?;
        let bytes = fs::read(path)?;
        files.push((name.to_string(), bytes));
    }

    let assistant = RemoteAssistant::new(config.assistant.assistant_config())?;

    // Verify the configured assistant exists before consuming any file-store
    // slots; a bad id or endpoint surfaces here as a configuration error.
    assistant.retrieve_assistant().await.map_err(|e| {
        CliError::Config(format!(
            "assistant '{}' is not ready: {}",
            config.assistant.assistant_id, e
        ))
    })?;

    let client = ExtractionClient::new(assistant, config.assistant.extractor_config());
    let store = RemoteStore::new(config.store.store_config())?;

    if args.blobs {
        let blobs = RemoteBlobStore::new(config.store.store_config())?;
        let ctrl = IntakeController::with_blob_store(client, store, blobs);
        run_batch(ctrl, files, formatter).await
    } else {
        let ctrl = IntakeController::new(client, store);
        run_batch(ctrl, files, formatter).await
    }
}

/// Run one batch with live progress output and Ctrl-C cancellation.
async fn run_batch<A, S, B>(
    ctrl: IntakeController<A, S, B>,
    files: Vec<(String, Vec<u8>)>,
    formatter: &Formatter,
) -> Result<()>
where
    A: AssistantJobs + Send + Sync,
    A::Error: Display,
    S: DocumentStore + Send + Sync,
    S::Error: Display,
    B: BlobStore + Send + Sync,
    B::Error: Display,
{
    let (sink, mut rx) = EventSink::channel();
    let ctrl = ctrl.with_events(sink);

    let printer = {
        let formatter = formatter.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    IntakeEvent::FileStarted { filename } => {
                        println!("{}", formatter.info(&format!("Processing {}", filename)));
                    }
                    IntakeEvent::FileSkipped { filename } => {
                        println!(
                            "{}",
                            formatter.warning(&format!("Skipped duplicate {}", filename))
                        );
                    }
                    IntakeEvent::FileCompleted { filename, progress } => {
                        println!("{}", formatter.success(&format!("{} ({})", filename, progress)));
                    }
                    IntakeEvent::FileFailed { filename, message } => {
                        eprintln!("{}", formatter.error(&format!("{}: {}", filename, message)));
                    }
                    _ => {}
                }
            }
        })
    };

    // Ctrl-C requests cooperative cancellation; completed files are kept
    let cancel = ctrl.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let report = ctrl.upload_batch(files).await?;

    // Close the event channel so the printer drains and exits
    drop(ctrl);
    printer.await.ok();

    match report.state {
        BatchState::Completed => {
            println!(
                "{}",
                formatter.success(&format!("Batch completed ({})", report.progress))
            );
        }
        BatchState::Cancelled => {
            println!(
                "{}",
                formatter.warning(&format!("Batch cancelled ({})", report.progress))
            );
        }
        _ => {}
    }

    if let Some(error) = report.error {
        return Err(error.into());
    }

    println!("{}", formatter.format_records(&report.set, None)?);
    Ok(())
}
