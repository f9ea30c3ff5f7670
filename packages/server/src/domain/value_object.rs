//! Value objects of the broadcast chat domain.

use std::fmt;

use chrono::{DateTime, Utc};
use hiroba_shared::time::to_iso8601;

use super::error::ValueObjectError;

/// Opaque identifier assigned to a connection when it is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub(super) String);

impl ClientId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyClientId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display name chosen by a client with its first message.
///
/// The raw payload is trimmed of surrounding whitespace. Anything else,
/// including text that looks like a command (`/help`), is taken literally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: &str) -> Result<Self, ValueObjectError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyDisplayName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a chat message, trimmed of surrounding whitespace.
///
/// May be empty: a blank payload from a named client is still a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Instant attached to envelopes and connection records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    /// ISO-8601 representation used on the wire.
    pub fn to_iso8601(&self) -> String {
        to_iso8601(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiroba_shared::time::{Clock, FixedClock};

    #[test]
    fn test_client_id_rejects_empty_value() {
        // テスト項目: 空文字列からはクライアント ID を生成できない
        // given (前提条件):
        let value = String::new();

        // when (操作):
        let result = ClientId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyClientId));
    }

    #[test]
    fn test_display_name_is_trimmed() {
        // テスト項目: 表示名は前後の空白が除去される
        // given (前提条件):
        let raw = "  Alice \n";

        // when (操作):
        let name = DisplayName::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_display_name_rejects_whitespace_only() {
        // テスト項目: 空白のみの表示名は拒否される
        // given (前提条件):
        let raw = " \t \r\n";

        // when (操作):
        let result = DisplayName::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyDisplayName));
    }

    #[test]
    fn test_display_name_keeps_command_like_text() {
        // テスト項目: コマンドのような文字列もそのまま表示名として受け付ける
        // given (前提条件):
        let raw = "/help";

        // when (操作):
        let name = DisplayName::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), "/help");
    }

    #[test]
    fn test_message_content_is_trimmed() {
        // テスト項目: メッセージ本文は前後の空白が除去される
        // given (前提条件):
        let raw = "  hello world \n";

        // when (操作):
        let content = MessageContent::new(raw);

        // then (期待する結果):
        assert_eq!(content.as_str(), "hello world");
    }

    #[test]
    fn test_message_content_accepts_whitespace_only() {
        // テスト項目: 空白のみのメッセージ本文は空文字列として受け付ける
        // given (前提条件):
        let raw = "   ";

        // when (操作):
        let content = MessageContent::new(raw);

        // then (期待する結果):
        assert_eq!(content.as_str(), "");
    }

    #[test]
    fn test_timestamp_to_iso8601() {
        // テスト項目: タイムスタンプが ISO-8601 文字列に変換される
        // given (前提条件):
        let clock = FixedClock::from_millis(1_700_000_000_000);

        // when (操作):
        let timestamp = Timestamp::new(clock.now());

        // then (期待する結果):
        assert_eq!(timestamp.to_iso8601(), "2023-11-14T22:13:20.000Z");
    }
}
