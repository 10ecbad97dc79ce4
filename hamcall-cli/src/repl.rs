use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::app::App;
use crate::command::{CommandType, HELP_TEXT, ParsedCommand};

pub const ABOUT_TEXT: &str = concat!(
    "hamcall ",
    env!("CARGO_PKG_VERSION"),
    "\nLooks up amateur radio operators by call sign using the HamDB directory (hamdb.org)."
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Read prompt lines from stdin until `/quit` or end of input.
pub async fn run(app: &App) -> anyhow::Result<()> {
    info!("Interactive session started");
    println!("hamcall: type a call sign, or /help");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        if dispatch(app, &line).await == Flow::Quit {
            break;
        }
    }

    info!("Interactive session ended");
    Ok(())
}

/// Execute one prompt line.
pub async fn dispatch(app: &App, line: &str) -> Flow {
    let cmd = ParsedCommand::parse(line);
    if cmd.is_blank() {
        return Flow::Continue;
    }
    debug!("Prompt command: {} ({:?})", cmd.command_type.as_str(), cmd.arguments);

    match cmd.command_type {
        CommandType::Lookup => {
            // outcome already printed by the presenters
            let _ = app.lookup(&cmd.arguments).await;
        }
        CommandType::History => println!("{}", app.history_text()),
        CommandType::Recall => match cmd.recall_index() {
            Some(index) => {
                if app.recall(index).await.is_none() {
                    println!("No history entry {}", index + 1);
                }
            }
            None => println!("Usage: /recall <n>"),
        },
        CommandType::Clear => {
            app.clear_history().await;
            println!("History cleared");
        }
        CommandType::Theme => {
            let theme = app.toggle_theme().await;
            println!("Switched to {} mode", theme);
        }
        CommandType::Map => match app.expand_map() {
            Some(text) => {
                println!("{}", text);
                app.close_map();
            }
            None => println!("No location to show yet"),
        },
        CommandType::About => println!("{}\nMap theme: {}", ABOUT_TEXT, app.theme().await),
        CommandType::Help => println!("{}", HELP_TEXT),
        CommandType::Quit => return Flow::Quit,
        CommandType::Unknown => println!("Unknown command {:?}, try /help", cmd.raw_text),
    }

    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::StubDirectory;
    use hamcall_common::Theme;
    use hamcall_core::storage::MemoryStore;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    async fn app_with(directory: Arc<StubDirectory>) -> App {
        App::assemble(Arc::new(MemoryStore::new()), directory).await
    }

    #[tokio::test]
    async fn test_quit_and_blank() {
        let app = app_with(Arc::new(StubDirectory::default())).await;
        assert_eq!(dispatch(&app, "/quit").await, Flow::Quit);
        assert_eq!(dispatch(&app, "/EXIT").await, Flow::Quit);
        assert_eq!(dispatch(&app, "   ").await, Flow::Continue);
    }

    #[tokio::test]
    async fn test_bare_text_and_recall_hit_directory() {
        let directory = Arc::new(StubDirectory::default());
        let app = app_with(directory.clone()).await;

        assert_eq!(dispatch(&app, "w1aw").await, Flow::Continue);
        assert_eq!(dispatch(&app, "/recall 1").await, Flow::Continue);
        assert_eq!(dispatch(&app, "/recall 5").await, Flow::Continue);
        assert_eq!(directory.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_short_input_skips_directory() {
        let directory = Arc::new(StubDirectory::default());
        let app = app_with(directory.clone()).await;

        dispatch(&app, "XX").await;
        dispatch(&app, "/lookup").await;
        assert_eq!(directory.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_theme_and_clear() {
        let app = app_with(Arc::new(StubDirectory::default())).await;

        dispatch(&app, "/theme").await;
        assert_eq!(app.theme().await, Theme::Light);

        dispatch(&app, "W1AW").await;
        dispatch(&app, "/clear").await;
        assert_eq!(app.history_text(), "No recent lookups");
    }

    #[tokio::test]
    async fn test_map_closes_after_printing() {
        let app = app_with(Arc::new(StubDirectory::default())).await;
        dispatch(&app, "W1AW").await;
        assert_eq!(dispatch(&app, "/map").await, Flow::Continue);
        // reopening works since the marker is still known
        assert!(app.expand_map().is_some());
    }
}
