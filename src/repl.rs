//! Interactive prompt: each line is a free-text request that is turned into
//! search parameters and run.

use crate::llm::ParameterResolver;
use crate::present::{self, OutputFormat};
use crate::search::DirectorySearch;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use rustyline::history::History;

const QUIT_WORDS: &[&str] = &["quit", "exit", "q"];

/// Runs the prompt loop until the user quits.
///
/// Ctrl-C while a search runs abandons that search only; Ctrl-C or Ctrl-D
/// at the prompt ends the session.
pub async fn run(
    search: &mut DirectorySearch,
    resolver: &dyn ParameterResolver,
    format: OutputFormat,
) -> Result<(), ReadlineError> {
    println!("AMGR Directory Search - Interactive Mode");
    println!("Enter natural language commands or 'quit' to exit");
    println!("Example: 'Find members in Kansas with American Red breed'");

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("\n> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let command = line.trim();
        if is_quit(command) {
            return Ok(());
        }
        if command.is_empty() {
            continue;
        }
        remember(editor.history_mut(), command);

        tokio::select! {
            _ = run_command(search, resolver, command, format) => {}
            _ = tokio::signal::ctrl_c() => {
                ::log::warn!("Search interrupted");
            }
        }
    }
}

async fn run_command(
    search: &mut DirectorySearch,
    resolver: &dyn ParameterResolver,
    command: &str,
    format: OutputFormat,
) {
    let request = resolver.resolve(command).await;
    println!("Searching: {}", request);

    let max_pages = search.config().max_pages;
    let results = search.perform_search(&request, max_pages).await;
    present::print(&results, format);
}

fn remember<H: History>(history: &mut H, command: &str) {
    if let Err(e) = history.add(command) {
        ::log::debug!("Could not record history entry: {}", e);
    }
}

fn is_quit(command: &str) -> bool {
    QUIT_WORDS.contains(&command.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::DefaultHistory;

    #[test]
    fn test_quit_words() {
        assert!(is_quit("quit"));
        assert!(is_quit("EXIT"));
        assert!(is_quit("q"));
        assert!(!is_quit("quiet herds in Ohio"));
        assert!(!is_quit(""));
    }

    #[test]
    fn test_commands_are_remembered_once() {
        let mut history = DefaultHistory::new();
        remember(&mut history, "members in Kansas");
        remember(&mut history, "members in Kansas");
        assert_eq!(history.len(), 1);
        assert!(!history.is_empty());
    }
}
