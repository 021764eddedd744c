pub const START_COMMAND: &str = "/start";

pub const UNKNOWN_SENDER: &str = "Unknown sender";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageIntent {
    Start,
    CreateTask { title: String },
    Ignore,
}

pub fn classify(text: &str) -> MessageIntent {
    let normalized = text.trim();
    if normalized.is_empty() {
        return MessageIntent::Ignore;
    }
    if normalized == START_COMMAND {
        return MessageIntent::Start;
    }
    MessageIntent::CreateTask {
        title: normalized.to_string(),
    }
}

/// Removes `<@id>` / `<@!id>` mentions of the bot so only the task text remains.
pub fn strip_mention(text: &str, bot_id: u64) -> String {
    text.replace(&format!("<@!{}>", bot_id), "")
        .replace(&format!("<@{}>", bot_id), "")
        .trim()
        .to_string()
}

pub fn sender_label(sender_name: Option<&str>) -> String {
    match sender_name.map(str::trim) {
        Some(name) if !name.is_empty() => format!("@{}", name.trim_start_matches('@')),
        _ => UNKNOWN_SENDER.to_string(),
    }
}

pub fn prefixed_title(title: &str, sender_name: Option<&str>) -> String {
    format!("{} {}", sender_label(sender_name), title)
}
