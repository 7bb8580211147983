//! Message formatting utilities for client display.

use echotalk_server::infrastructure::dto::websocket::ChatMessageDto;

const RULE: &str = "------------------------------------------------------------";
const HEAVY_RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Banner printed once per connection with the room's history so far
    pub fn format_history(room_id: i64, messages: &[ChatMessageDto], me: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", HEAVY_RULE));
        output.push_str(&format!("Room {}\n", room_id));

        if messages.is_empty() {
            output.push_str("(No messages yet)\n");
        } else {
            for message in messages {
                output.push_str(&format!(
                    "[{}] {}: {}\n",
                    message.created_at,
                    Self::display_name(&message.sender_name, me),
                    message.body
                ));
            }
        }

        output.push_str(&format!("{}\n", HEAVY_RULE));
        output
    }

    /// A live chat message
    pub fn format_chat_message(message: &ChatMessageDto, me: &str) -> String {
        // id is null when the server could not store the message
        let unsaved = if message.id.is_none() { " (not saved)" } else { "" };
        format!(
            "\n\n{rule}\n@{}: {}\nsent at {}{}\n{rule}\n",
            Self::display_name(&message.sender_name, me),
            message.body,
            message.created_at,
            unsaved,
            rule = RULE
        )
    }

    /// A text frame that is not a chat message
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    fn display_name(sender_name: &str, me: &str) -> String {
        if !me.is_empty() && sender_name == me {
            format!("{} (me)", sender_name)
        } else {
            sender_name.to_string()
        }
    }
}
