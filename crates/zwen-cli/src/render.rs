//! Terminal rendering.

use colored::Colorize;
use zwen_core::attachment::Attachment;
use zwen_core::session::{Message, Sender, Session, SessionSummary};

pub fn message(message: &Message) {
    let time = message.timestamp.format("%H:%M");
    match message.sender {
        Sender::User => println!(
            "{} {}",
            format!("[{}] {}:", time, message.sender.label()).bright_blue(),
            message.content
        ),
        Sender::Assistant => println!(
            "{} {}",
            format!("[{}] {}:", time, message.sender.label()).bright_green(),
            message.content.green()
        ),
    }
}

pub fn header(session: &Session) {
    println!("{}", format!("── {} ──", session.title).bright_yellow());
}

pub fn transcript(session: &Session) {
    header(session);
    for m in &session.messages {
        message(m);
    }
}

pub fn session_list(sessions: &[SessionSummary], active: Option<&str>) {
    if sessions.is_empty() {
        println!("{}", "No chats yet.".dimmed());
        return;
    }
    for (index, summary) in sessions.iter().enumerate() {
        let marker = if Some(summary.id.as_str()) == active { "*" } else { " " };
        let preview = summary.preview.as_deref().unwrap_or("(empty)");
        println!(
            "{} {:>2}. {} {} {}",
            marker.bright_yellow(),
            index + 1,
            summary.title.bold(),
            format!("({} messages, {})", summary.message_count, summary.updated_at.format("%Y-%m-%d %H:%M")).dimmed(),
            preview.dimmed()
        );
    }
}

pub fn upload_card(attachment: &Attachment) {
    let icon = if attachment.kind.is_image() { "🖼️" } else { "📄" };
    println!("{}", format!("📤 Uploading {}: {}...", attachment.kind, attachment.name).cyan());
    println!("{} {}", icon, attachment.name.bold());
    println!("   {}", attachment.describe().dimmed());
}

pub fn typing() {
    println!("{}", "Zwen AI is typing...".dimmed());
}

pub fn info(text: &str) {
    println!("{}", text.bright_yellow());
}

pub fn error(text: &str) {
    eprintln!("{}", text.red());
}
