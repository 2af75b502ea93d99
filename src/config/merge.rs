//! Layering of command-line flags over file and environment configuration.

use crate::domain::Config;
use std::path::PathBuf;

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_key: Option<String>,
    pub corpus_key: Option<String>,
    pub page_size: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub recency_days: Option<i64>,
    pub top_pairs: Option<usize>,
    pub fallback_encoding: Option<String>,
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    if let Some(key) = cli.api_key.filter(|k| !k.trim().is_empty()) {
        config.api_key = Some(key);
    }
    if let Some(corpus) = cli.corpus_key {
        config.corpus_key = corpus;
    }
    if let Some(size) = cli.page_size {
        config.page_size = size;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(days) = cli.recency_days {
        config.recency_days = days;
    }
    if let Some(n) = cli.top_pairs {
        config.top_pairs = n;
    }
    if let Some(encoding) = cli.fallback_encoding {
        config.fallback_encoding = encoding;
    }

    // Zero would never advance the pager.
    config.page_size = config.page_size.max(1);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_overrides_keep_config() {
        let config = Config { corpus_key: "from_file".to_string(), ..Config::default() };
        let merged = merge_cli_with_config(config.clone(), CliOverrides::default());
        assert_eq!(merged, config);
    }

    #[test]
    fn test_cli_values_win() {
        let config = Config { page_size: 20, ..Config::default() };
        let merged = merge_cli_with_config(
            config,
            CliOverrides {
                page_size: Some(500),
                corpus_key: Some("other".to_string()),
                output_dir: Some(PathBuf::from("out")),
                ..CliOverrides::default()
            },
        );
        assert_eq!(merged.page_size, 500);
        assert_eq!(merged.corpus_key, "other");
        assert_eq!(merged.output_dir, PathBuf::from("out"));
        assert_eq!(merged.recency_days, 365);
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let config = Config { api_key: Some("file-key".to_string()), ..Config::default() };
        let merged = merge_cli_with_config(
            config,
            CliOverrides { api_key: Some("  ".to_string()), ..CliOverrides::default() },
        );
        assert_eq!(merged.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_zero_page_size_clamped() {
        let merged = merge_cli_with_config(
            Config::default(),
            CliOverrides { page_size: Some(0), ..CliOverrides::default() },
        );
        assert_eq!(merged.page_size, 1);
    }
}
