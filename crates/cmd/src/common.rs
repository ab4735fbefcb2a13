use std::path::PathBuf;

use steward::StewardConfig;

/// Build the steward configuration from command line overrides.
///
/// The directory comes from `--dir`, then `SIMFS_HOME`, then the current
/// directory. `--image` and `--journal` replace the individual files.
pub fn config_with_overrides(
    dir: Option<PathBuf>,
    image: Option<PathBuf>,
    journal: Option<PathBuf>,
) -> StewardConfig {
    let mut config = StewardConfig::from_env_or(dir);
    if let Some(image) = image {
        config = config.with_image(image);
    }
    if let Some(journal) = journal {
        config = config.with_journal(journal);
    }
    config
}

/// Format milliseconds since the epoch for display
pub fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Helper function to truncate strings for display
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
