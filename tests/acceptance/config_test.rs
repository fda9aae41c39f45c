use std::fs;
use tempfile::TempDir;

use roleform::config::Config;

// Both scenarios share process-wide environment variables, so they run in one test.
#[test]
fn test_config_file_and_env_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::env::set_var("ROLEFORM_CONFIG_PATH", &config_path);
    std::env::remove_var("ROLEFORM_API_URL");
    std::env::remove_var("ROLEFORM_REQUEST_TIMEOUT_SECONDS");

    let config = Config::load().unwrap();
    assert_eq!(config.api_url, "http://localhost:5000");
    assert_eq!(config.request_timeout_seconds, None);

    fs::write(
        &config_path,
        "api_url = \"http://roles.internal:8080\"\nrequest_timeout_seconds = 10\n",
    )
    .unwrap();
    let config = Config::load().unwrap();
    assert_eq!(config.api_url, "http://roles.internal:8080");
    assert_eq!(config.request_timeout_seconds, Some(10));

    std::env::set_var("ROLEFORM_API_URL", "http://override:9000");
    std::env::set_var("ROLEFORM_REQUEST_TIMEOUT_SECONDS", "3");
    let config = Config::load().unwrap();
    assert_eq!(config.api_url, "http://override:9000");
    assert_eq!(config.request_timeout_seconds, Some(3));

    std::env::remove_var("ROLEFORM_API_URL");
    std::env::remove_var("ROLEFORM_REQUEST_TIMEOUT_SECONDS");

    fs::remove_file(&config_path).unwrap();
    Config::default().save().unwrap();
    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("api_url = \"http://localhost:5000\""));

    std::env::remove_var("ROLEFORM_CONFIG_PATH");
}
