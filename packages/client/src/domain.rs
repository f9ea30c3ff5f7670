//! Domain logic for client-side input handling.
//!
//! Pure functions deciding what to do with a line typed at the prompt,
//! kept free of I/O so they are easy to test.

/// Lines that end the session
pub const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

/// Line that prints the command list locally
pub const HELP_COMMAND: &str = "/help";

/// Command list shown for `/help`
pub const HELP_TEXT: &str = "\
Available commands:
/help - Show this help message
/quit or /exit - Disconnect from server
Type any message to broadcast to all users";

/// What the input loop should do with one line typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// End the session
    Quit,
    /// Show the command list without sending anything
    Help,
    /// Nothing to send (blank line)
    Skip,
    /// Send the trimmed text to the server
    Send(String),
}

/// Classify one line typed at the prompt
pub fn classify_input(line: &str) -> InputAction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return InputAction::Skip;
    }
    if QUIT_COMMANDS.contains(&trimmed) {
        return InputAction::Quit;
    }
    if trimmed == HELP_COMMAND {
        return InputAction::Help;
    }
    InputAction::Send(trimmed.to_string())
}
