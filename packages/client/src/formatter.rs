//! Message formatting utilities for client display.

use hiroba_server::infrastructure::dto::websocket::{EnvelopeDto, MessageType};
use hiroba_shared::time::iso8601_to_local_time;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format one server envelope as a single display line
    ///
    /// # Arguments
    ///
    /// * `envelope` - The envelope received from the server
    ///
    /// # Returns
    ///
    /// `[HH:MM:SS] ...` in local time. Chat lines show `name: content`,
    /// server notices `Server: content` and errors `Error: content`.
    pub fn format_envelope(envelope: &EnvelopeDto) -> String {
        let time = Self::format_time(&envelope.timestamp);
        let content = envelope.content.as_deref().unwrap_or_default();
        let username = envelope.username.as_deref();

        match envelope.r#type {
            MessageType::Message => match username {
                Some(name) => format!("[{}] {}: {}", time, name, content),
                None => format!("[{}] Server: {}", time, content),
            },
            MessageType::Join => match (envelope.content.as_deref(), username) {
                (Some(content), _) => format!("[{}] {}", time, content),
                (None, Some(name)) => format!("[{}] {} joined the chat", time, name),
                (None, None) => format!("[{}] someone joined the chat", time),
            },
            MessageType::Leave => match (envelope.content.as_deref(), username) {
                (Some(content), _) => format!("[{}] {}", time, content),
                (None, Some(name)) => format!("[{}] {} left the chat", time, name),
                (None, None) => format!("[{}] someone left the chat", time),
            },
            MessageType::Error => format!("[{}] Error: {}", time, content),
        }
    }

    /// Format a raw text frame that is not a valid envelope
    pub fn format_raw_message(text: &str) -> String {
        format!("Received: {}", text)
    }

    fn format_time(timestamp: &str) -> String {
        iso8601_to_local_time(timestamp).unwrap_or_else(|| timestamp.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(
        r#type: MessageType,
        username: Option<&str>,
        content: Option<&str>,
        timestamp: &str,
    ) -> EnvelopeDto {
        EnvelopeDto {
            r#type,
            username: username.map(str::to_string),
            content: content.map(str::to_string),
            timestamp: timestamp.to_string(),
            client_id: None,
        }
    }

    #[test]
    fn test_format_chat_message() {
        // テスト項目: チャットメッセージは "名前: 本文" で表示される
        // given (前提条件):
        let dto = envelope(MessageType::Message, Some("Alice"), Some("hi"), "12:00");

        // when (操作):
        let result = MessageFormatter::format_envelope(&dto);

        // then (期待する結果):
        assert_eq!(result, "[12:00] Alice: hi");
    }

    #[test]
    fn test_format_server_notice() {
        // テスト項目: username を持たない message はサーバー通知として表示される
        // given (前提条件):
        let dto = envelope(
            MessageType::Message,
            None,
            Some("Welcome Alice! You can now send messages."),
            "12:00",
        );

        // when (操作):
        let result = MessageFormatter::format_envelope(&dto);

        // then (期待する結果):
        assert_eq!(
            result,
            "[12:00] Server: Welcome Alice! You can now send messages."
        );
    }

    #[test]
    fn test_format_join_and_leave() {
        // テスト項目: join / leave は本文がそのまま表示される
        // given (前提条件):
        let joined = envelope(
            MessageType::Join,
            Some("Bob"),
            Some("Bob joined the chat"),
            "12:00",
        );
        let left = envelope(
            MessageType::Leave,
            Some("Bob"),
            Some("Bob left the chat"),
            "12:01",
        );

        // when (操作):
        let joined = MessageFormatter::format_envelope(&joined);
        let left = MessageFormatter::format_envelope(&left);

        // then (期待する結果):
        assert_eq!(joined, "[12:00] Bob joined the chat");
        assert_eq!(left, "[12:01] Bob left the chat");
    }

    #[test]
    fn test_format_join_without_content_uses_username() {
        // テスト項目: 本文のない join は username から文言を組み立てる
        // given (前提条件):
        let dto = envelope(MessageType::Join, Some("Bob"), None, "12:00");

        // when (操作):
        let result = MessageFormatter::format_envelope(&dto);

        // then (期待する結果):
        assert_eq!(result, "[12:00] Bob joined the chat");
    }

    #[test]
    fn test_format_error() {
        // テスト項目: error は "Error: 本文" で表示される
        // given (前提条件):
        let dto = envelope(
            MessageType::Error,
            None,
            Some("Error processing your message"),
            "12:00",
        );

        // when (操作):
        let result = MessageFormatter::format_envelope(&dto);

        // then (期待する結果):
        assert_eq!(result, "[12:00] Error: Error processing your message");
    }

    #[test]
    fn test_format_valid_timestamp_as_wall_clock() {
        // テスト項目: ISO-8601 のタイムスタンプは HH:MM:SS に変換される
        // given (前提条件):
        let dto = envelope(
            MessageType::Message,
            Some("Alice"),
            Some("hi"),
            "2024-01-01T00:00:00.000Z",
        );

        // when (操作):
        let result = MessageFormatter::format_envelope(&dto);

        // then (期待する結果): ローカルタイムゾーンに依存するため形だけ確認する
        let (time, rest) = result.split_once("] ").unwrap();
        assert_eq!(rest, "Alice: hi");
        let time = time.trim_start_matches('[');
        assert_eq!(time.len(), 8);
        assert_eq!(time.matches(':').count(), 2);
    }

    #[test]
    fn test_format_raw_message() {
        // テスト項目: 解釈できないフレームは生のまま表示される
        // given (前提条件):
        let text = "unknown message format";

        // when (操作):
        let result = MessageFormatter::format_raw_message(text);

        // then (期待する結果):
        assert_eq!(result, "Received: unknown message format");
    }
}
