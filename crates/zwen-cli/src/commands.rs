//! REPL command parsing.

use std::path::PathBuf;
use zwen_core::attachment::AttachmentKind;

/// Commands offered for completion.
pub const COMMAND_NAMES: &[&str] = &[
    "/new", "/list", "/select", "/attach", "/photo", "/image", "/help", "/quit",
];

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Plain text for Zwen AI
    Send(String),
    New,
    List,
    /// Select by 1-based list position or by session id
    Select(String),
    Attach { path: PathBuf, kind: AttachmentKind },
    Help,
    Quit,
    /// A slash command that was not understood
    Invalid(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return ReplCommand::Send(line.to_string());
        }

        let (name, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (trimmed, ""),
        };

        match (name, arg.is_empty()) {
            ("/new", _) => ReplCommand::New,
            ("/list", _) => ReplCommand::List,
            ("/help", _) => ReplCommand::Help,
            ("/quit" | "/exit", _) => ReplCommand::Quit,
            ("/select", false) => ReplCommand::Select(arg.to_string()),
            ("/attach", false) => attach(arg, AttachmentKind::File),
            ("/image", false) => attach(arg, AttachmentKind::Image),
            ("/photo", false) => attach(arg, AttachmentKind::Camera),
            ("/select" | "/attach" | "/image" | "/photo", true) => {
                ReplCommand::Invalid(format!("{} needs an argument", name))
            }
            _ => ReplCommand::Invalid(format!("Unknown command {}", name)),
        }
    }
}

fn attach(arg: &str, kind: AttachmentKind) -> ReplCommand {
    ReplCommand::Attach {
        path: PathBuf::from(arg),
        kind,
    }
}

pub const HELP_TEXT: &str = "\
🆘 Zwen AI Help:
  <text>            chat with Zwen AI
  /new              start a new chat
  /list             list chats (newest first)
  /select <n|id>    switch to a chat
  /attach <path>    upload a file (PDF, Word, Text, ...)
  /image <path>     upload an image (JPG, PNG, ...)
  /photo <path>     upload a camera photo
  /quit             leave";
