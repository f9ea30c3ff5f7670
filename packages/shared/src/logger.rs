//! Logging setup utilities for the Hiroba broadcast chat.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Library crates whose log output follows the default level.
const WORKSPACE_TARGETS: [&str; 3] = ["hiroba_shared", "hiroba_server", "hiroba_client"];

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Every workspace library plus the binary itself gets `default_log_level`;
/// other crates (axum, hyper, tungstenite) stay at the subscriber default.
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    WORKSPACE_TARGETS
        .iter()
        .copied()
        .chain(std::iter::once(binary_name))
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "hiroba")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use hiroba_shared::logger::setup_logger;
///
/// setup_logger("hiroba", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    let env_directive = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = resolve_directive(env_directive.as_deref(), binary_name, default_log_level);

    tracing_subscriber::registry()
        .with(EnvFilter::new(&directive))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("Logger initialized with filter '{}'", directive);
}

/// Pick the filter directive: `RUST_LOG` when set and non-blank, otherwise
/// the workspace default from [`default_directive`].
pub fn resolve_directive(
    env_directive: Option<&str>,
    binary_name: &str,
    default_log_level: &str,
) -> String {
    match env_directive.map(str::trim) {
        Some(directive) if !directive.is_empty() => directive.to_string(),
        _ => default_directive(binary_name, default_log_level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_covers_workspace_and_binary() {
        // テスト項目: ワークスペースの全クレートとバイナリにデフォルトレベルが設定される
        // given (前提条件):
        let binary_name = "hiroba";

        // when (操作):
        let directive = default_directive(binary_name, "debug");

        // then (期待する結果):
        assert_eq!(
            directive,
            "hiroba_shared=debug,hiroba_server=debug,hiroba_client=debug,hiroba=debug"
        );
    }

    #[test]
    fn test_default_directive_normalizes_hyphenated_binary_name() {
        // テスト項目: ハイフンを含むバイナリ名はターゲット名に変換される
        // given (前提条件):
        let binary_name = "hiroba-bench";

        // when (操作):
        let directive = default_directive(binary_name, "warn");

        // then (期待する結果):
        assert!(directive.ends_with("hiroba_bench=warn"));
    }

    #[test]
    fn test_resolve_directive_prefers_environment() {
        // テスト項目: RUST_LOG が設定されていればその値が使われる
        // given (前提条件):
        let env_directive = Some("hiroba_server=trace");

        // when (操作):
        let directive = resolve_directive(env_directive, "hiroba", "debug");

        // then (期待する結果):
        assert_eq!(directive, "hiroba_server=trace");
    }

    #[test]
    fn test_resolve_directive_falls_back_to_default() {
        // テスト項目: RUST_LOG が未設定または空白のみならデフォルトが使われる
        // given (前提条件):
        let expected = default_directive("hiroba", "warn");

        // when (操作):
        let unset = resolve_directive(None, "hiroba", "warn");
        let blank = resolve_directive(Some("  "), "hiroba", "warn");

        // then (期待する結果):
        assert_eq!(unset, expected);
        assert_eq!(blank, expected);
    }
}
