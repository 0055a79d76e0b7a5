//! Interactive chat command implementation.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lexintake_assistant::RemoteAssistant;
use lexintake_domain::batch::CancelFlag;
use lexintake_extractor::ChatSession;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Execute the chat command: an interactive question loop against the
/// configured assistant, reusing one thread for the whole session.
pub async fn execute_chat(config: &Config, formatter: &Formatter) -> Result<()> {
    let assistant = RemoteAssistant::new(config.assistant.assistant_config())?;
    let mut session = ChatSession::new(assistant, config.assistant.extractor_config());
    let cancel = CancelFlag::new();

    println!(
        "{}",
        formatter.info("Lexintake chat - Ask about your documents, 'exit' to quit")
    );
    println!();

    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("lexintake> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }
                if matches!(line, "exit" | "quit" | "q") {
                    break;
                }

                editor.add_history_entry(line).ok();

                match session.ask(line, &cancel).await {
                    Ok(answer) => {
                        println!("{}", answer);
                        println!();
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let dir = home.join(".lexintake");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}
