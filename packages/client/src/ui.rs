//! UI utilities for the client.

use std::io::Write;

/// Prompt shown while the server waits for a username
pub const USERNAME_PROMPT: &str = "username> ";

/// Prompt shown once the username has been sent
pub const CHAT_PROMPT: &str = "> ";

/// Print a server line above the prompt and redisplay the prompt
pub fn print_above_prompt(line: &str, prompt: &str) {
    println!("{}", over_prompt(line));
    redisplay_prompt(prompt);
}

/// Move to column 0 and erase the half-typed prompt line before `line`
fn over_prompt(line: &str) -> String {
    format!("\r\x1b[2K{}", line)
}

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(prompt: &str) {
    print!("{}", prompt);
    std::io::stdout().flush().ok();
}
