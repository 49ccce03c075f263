mod commands;
mod listing;
mod logging;
mod render;

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use zwen_application::{ChannelObserver, ChatService, PendingReply, SendOutcome, StoreEvent};
use zwen_core::KeyValueStore;
use zwen_core::session::SessionStore;
use zwen_infrastructure::{
    ConfigService, FileKeyValueStore, MemoryKeyValueStore, ZwenPaths, probe_attachment,
};

use crate::commands::{COMMAND_NAMES, HELP_TEXT, ReplCommand};
use crate::listing::ChatListing;

#[derive(Parser, Debug)]
#[command(name = "zwen", version, about = "Chat with Zwen AI from the terminal")]
struct Cli {
    /// Directory holding config, chat history and logs
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep chats in memory only
    #[arg(long)]
    in_memory: bool,

    /// Log filter, e.g. `debug` or `zwen_core=trace`
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

/// Completion and highlighting for slash commands.
struct ReplHelper {
    commands: Vec<String>,
}

impl ReplHelper {
    fn new() -> Self {
        Self {
            commands: COMMAND_NAMES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ReplHelper {}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = ZwenPaths::new(cli.data_dir.clone());

    let _log_guard = logging::init(&paths.logs_dir()?, cli.log_level.as_deref())?;

    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => paths.config_file()?,
    };
    let config = ConfigService::new(config_path)
        .load()
        .context("Failed to load configuration")?;

    let backend: Arc<dyn KeyValueStore> = if cli.in_memory {
        match config.storage.quota_bytes {
            Some(quota) => Arc::new(MemoryKeyValueStore::with_quota(quota)),
            None => Arc::new(MemoryKeyValueStore::new()),
        }
    } else {
        let store =
            FileKeyValueStore::in_dir(&paths.data_dir()?).with_quota(config.storage.quota_bytes);
        tracing::info!(path = %store.path().display(), "Using file storage");
        Arc::new(store)
    };

    let store = SessionStore::new(backend, config.storage.clone());
    let service = ChatService::bootstrap(store, config.chat.clone());

    let (observer, events) = ChannelObserver::channel();
    service.subscribe(Arc::new(observer)).await;
    let listing = ChatListing::new(service.list_sessions().await);
    let printer = spawn_event_printer(events, listing.clone(), service.clone());

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ReplHelper::new()));

    println!("{}", "=== Zwen AI ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message to chat, '/help' for commands, or '/quit' to exit.".bright_black()
    );
    println!();

    if let Some(session) = service.active_session().await {
        render::transcript(&session);
    }

    let mut pending: Vec<PendingReply> = Vec::new();

    loop {
        pending.retain(|reply| !reply.is_finished());

        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                render::error(&format!("Error: {:?}", err));
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(&line);

        match ReplCommand::parse(&line) {
            ReplCommand::Send(text) => match service.on_user_send(&text).await {
                SendOutcome::Accepted(reply) => {
                    render::typing();
                    pending.push(reply);
                }
                SendOutcome::Busy => render::info("Zwen AI is still replying, please wait."),
                SendOutcome::Ignored => {}
            },
            ReplCommand::New => {
                // The greeting arrives through the event printer
                let session = service.on_new_chat_requested().await;
                render::header(&session);
            }
            ReplCommand::List => {
                let sessions = listing.snapshot().await;
                let active = service.active_session_id().await;
                render::session_list(&sessions, active.as_deref());
            }
            ReplCommand::Select(target) => select(&service, &listing, &target).await,
            ReplCommand::Attach { path, kind } => {
                let attachment = match probe_attachment(&path, kind) {
                    Ok(attachment) => attachment,
                    Err(e) => {
                        render::error(&format!("Cannot attach {}: {}", path.display(), e));
                        continue;
                    }
                };
                render::upload_card(&attachment);
                match service.on_attachment(attachment).await {
                    Ok(reply) => pending.push(reply),
                    Err(e) => render::error(&e.to_string()),
                }
            }
            ReplCommand::Help => println!("{}", HELP_TEXT.bright_black()),
            ReplCommand::Quit => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            ReplCommand::Invalid(message) => render::error(&message),
        }
    }

    // Let scheduled replies land so they are persisted before exit
    for reply in pending {
        reply.wait().await;
    }
    printer.abort();
    Ok(())
}

/// Selects a chat by its 1-based position in `/list` or by id.
async fn select(service: &ChatService, listing: &ChatListing, target: &str) {
    let Some(id) = listing.resolve(target).await else {
        render::error(&format!("No chat matches '{}'", target));
        return;
    };

    if !service.on_chat_selected(&id).await {
        render::error(&format!("No chat with id {}", id));
        return;
    }
    if let Some(session) = service.active_session().await {
        render::transcript(&session);
    }
}

/// Renders replies and tracks list changes while the prompt keeps reading.
fn spawn_event_printer(
    mut events: UnboundedReceiver<StoreEvent>,
    listing: ChatListing,
    service: ChatService,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let Some((session_id, message)) = listing.apply(event).await else {
                continue;
            };
            if service.active_session_id().await.as_deref() == Some(session_id.as_str()) {
                render::message(&message);
            } else {
                let title = listing.title_of(&session_id).await.unwrap_or(session_id);
                render::info(&format!("New reply in '{}' (use /select to read it)", title));
            }
        }
    })
}
