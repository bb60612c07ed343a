use super::*;
use std::path::Path;

#[test]
fn test_get_config_path() {
    let data_dir = Path::new("/srv/portfolio");
    assert_eq!(
        get_config_path(data_dir),
        Path::new("/srv/portfolio/portfolio.toml")
    );
}

#[test]
fn test_config_file_constant() {
    assert_eq!(CONFIG_FILE, "portfolio.toml");
}

#[test]
fn test_default_portfolio_home_ends_with_folder() {
    if std::env::var("PORTFOLIO_HOME").is_err() {
        assert!(default_portfolio_home().ends_with(PORTFOLIO_FOLDER));
    }
}

#[test]
fn test_now_iso_format() {
    let timestamp = now_iso();

    assert!(timestamp.len() > 20, "Timestamp should be reasonably long");
    assert!(timestamp.contains('-'), "Should contain date separator");
    assert!(timestamp.contains(':'), "Should contain time separator");

    let parsed = chrono::DateTime::parse_from_rfc3339(&timestamp);
    assert!(parsed.is_ok(), "Should be valid RFC3339 format");
}

#[test]
fn test_default_data_dir_is_below_home() {
    let data_dir = default_data_dir();
    assert!(data_dir.starts_with(default_portfolio_home()));
    assert!(data_dir.ends_with("data"));
}
