//! Tracing setup

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. `RUST_LOG` wins over `LOG_LEVEL` when set.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_lowercase()));

    let builder = fmt().with_env_filter(filter).with_target(true);
    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Plain => builder.try_init(),
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}

/// Keep the key prefix and last four characters, e.g. `pk_test_****abcd`
pub fn mask_key(key: &str) -> String {
    let prefix_len = ["pk_test_", "pk_live_", "sk_test_", "sk_live_"]
        .iter()
        .find(|p| key.starts_with(*p))
        .map(|p| p.len())
        .unwrap_or(0);
    let rest = &key[prefix_len..];
    let chars: Vec<char> = rest.chars().collect();
    if chars.len() <= 4 {
        return format!("{}****", &key[..prefix_len]);
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", &key[..prefix_len], tail)
}
