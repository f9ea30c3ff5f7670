//! Entities of the broadcast chat domain.

use super::value_object::{ClientId, DisplayName, MessageContent, Timestamp};

/// Protocol state of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientState {
    /// Connected, waiting for the first payload to become the display name.
    Unnamed,
    /// Display name registered; every later payload is a chat message.
    Named(DisplayName),
}

/// A connected client as tracked by the registry.
///
/// The outbound channel is not part of the record: it is owned by the
/// `MessagePusher`, keyed by the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub state: ClientState,
    pub connected_at: Timestamp,
}

impl Client {
    /// A freshly accepted client starts Unnamed.
    pub fn new(id: ClientId, connected_at: Timestamp) -> Self {
        Self {
            id,
            state: ClientState::Unnamed,
            connected_at,
        }
    }

    pub fn display_name(&self) -> Option<&DisplayName> {
        match &self.state {
            ClientState::Unnamed => None,
            ClientState::Named(name) => Some(name),
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self.state, ClientState::Named(_))
    }
}

/// Kind discriminator of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    /// Chat message (with sender) or private server notice (without sender).
    Message,
    Join,
    Leave,
    Error,
}

/// Structured message unit sent to clients.
///
/// Fields are private: an envelope is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    kind: EnvelopeKind,
    username: Option<DisplayName>,
    content: Option<String>,
    timestamp: Timestamp,
    client_id: Option<ClientId>,
}

impl Envelope {
    /// Private server notice (welcome, registration confirmation).
    pub fn notice(content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            kind: EnvelopeKind::Message,
            username: None,
            content: Some(content.into()),
            timestamp,
            client_id: None,
        }
    }

    /// Greeting unicast to every newly accepted connection.
    pub fn welcome(timestamp: Timestamp) -> Self {
        Self::notice(
            "Welcome to the broadcast server! Type your username to get started.",
            timestamp,
        )
    }

    /// Confirmation unicast to a client whose name was just registered.
    pub fn registered(name: &DisplayName, timestamp: Timestamp) -> Self {
        Self::notice(
            format!("Welcome {name}! You can now send messages."),
            timestamp,
        )
    }

    /// Chat message from a named client.
    pub fn chat(
        from: &ClientId,
        username: &DisplayName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            kind: EnvelopeKind::Message,
            username: Some(username.clone()),
            content: Some(content.into_string()),
            timestamp,
            client_id: Some(from.clone()),
        }
    }

    pub fn joined(client_id: &ClientId, username: &DisplayName, timestamp: Timestamp) -> Self {
        Self {
            kind: EnvelopeKind::Join,
            username: Some(username.clone()),
            content: Some(format!("{username} joined the chat")),
            timestamp,
            client_id: Some(client_id.clone()),
        }
    }

    pub fn left(client_id: &ClientId, username: &DisplayName, timestamp: Timestamp) -> Self {
        Self {
            kind: EnvelopeKind::Leave,
            username: Some(username.clone()),
            content: Some(format!("{username} left the chat")),
            timestamp,
            client_id: Some(client_id.clone()),
        }
    }

    pub fn error(content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            kind: EnvelopeKind::Error,
            username: None,
            content: Some(content.into()),
            timestamp,
            client_id: None,
        }
    }

    pub fn kind(&self) -> EnvelopeKind {
        self.kind
    }

    pub fn username(&self) -> Option<&DisplayName> {
        self.username.as_ref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiroba_shared::time::{Clock, FixedClock};

    fn timestamp() -> Timestamp {
        Timestamp::new(FixedClock::from_millis(1_000).now())
    }

    fn alice() -> (ClientId, DisplayName) {
        (
            ClientId::new("client_alice".to_string()).unwrap(),
            DisplayName::new("Alice").unwrap(),
        )
    }

    #[test]
    fn test_new_client_is_unnamed() {
        // テスト項目: 接続直後のクライアントは Unnamed 状態
        // given (前提条件):
        let (id, _) = alice();

        // when (操作):
        let client = Client::new(id, timestamp());

        // then (期待する結果):
        assert_eq!(client.state, ClientState::Unnamed);
        assert!(!client.is_named());
        assert!(client.display_name().is_none());
    }

    #[test]
    fn test_named_client_exposes_display_name() {
        // テスト項目: Named 状態のクライアントは表示名を返す
        // given (前提条件):
        let (id, name) = alice();
        let mut client = Client::new(id, timestamp());

        // when (操作):
        client.state = ClientState::Named(name.clone());

        // then (期待する結果):
        assert!(client.is_named());
        assert_eq!(client.display_name(), Some(&name));
    }

    #[test]
    fn test_chat_envelope_carries_sender() {
        // テスト項目: チャット Envelope には送信者の名前と ID が含まれる
        // given (前提条件):
        let (id, name) = alice();
        let content = MessageContent::new("hi");

        // when (操作):
        let envelope = Envelope::chat(&id, &name, content, timestamp());

        // then (期待する結果):
        assert_eq!(envelope.kind(), EnvelopeKind::Message);
        assert_eq!(envelope.username(), Some(&name));
        assert_eq!(envelope.content(), Some("hi"));
        assert_eq!(envelope.client_id(), Some(&id));
    }

    #[test]
    fn test_join_and_leave_envelopes_describe_the_user() {
        // テスト項目: join / leave Envelope の本文にユーザー名が含まれる
        // given (前提条件):
        let (id, name) = alice();

        // when (操作):
        let joined = Envelope::joined(&id, &name, timestamp());
        let left = Envelope::left(&id, &name, timestamp());

        // then (期待する結果):
        assert_eq!(joined.kind(), EnvelopeKind::Join);
        assert_eq!(joined.content(), Some("Alice joined the chat"));
        assert_eq!(left.kind(), EnvelopeKind::Leave);
        assert_eq!(left.content(), Some("Alice left the chat"));
    }

    #[test]
    fn test_notices_have_no_sender() {
        // テスト項目: サーバーからの通知には送信者情報が含まれない
        // given (前提条件):
        let (_, name) = alice();

        // when (操作):
        let welcome = Envelope::welcome(timestamp());
        let registered = Envelope::registered(&name, timestamp());

        // then (期待する結果):
        for envelope in [welcome, registered] {
            assert_eq!(envelope.kind(), EnvelopeKind::Message);
            assert!(envelope.username().is_none());
            assert!(envelope.client_id().is_none());
        }
    }
}
