//! Configuration store persistence through the public API.

use serial_test::serial;

use gpush::config::default_config_path;
use gpush::config::env::CONFIG_DIR_ENV_VAR;
use gpush::{Config, ConfigError, ConfigKey, Provider};

#[test]
#[serial]
fn test_config_dir_override_is_honored() {
    let dir = tempfile::tempdir().unwrap();
    temp_env::with_var(CONFIG_DIR_ENV_VAR, Some(dir.path()), || {
        assert_eq!(
            default_config_path().unwrap(),
            dir.path().join("config.toml")
        );

        let mut config = Config::load().unwrap();
        config.set(ConfigKey::Provider, "bedrock").unwrap();
        config.set(ConfigKey::AwsRegion, "ap-northeast-1").unwrap();

        let reloaded = Config::load().unwrap();
        assert_eq!(reloaded.provider().unwrap(), Provider::Bedrock);
        assert_eq!(reloaded.aws_region(), "ap-northeast-1");
    });
}

#[test]
fn test_hand_written_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "provider = \"openai\"\nopenai_model = \"gpt-4o\"\nopenai_api_key = \"sk-abcdefghijklmnopqrstuvwx9999\"\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.openai_model(), "gpt-4o");
    assert_eq!(
        config.openai_api_key().unwrap(),
        "sk-abcdefghijklmnopqrstuvwx9999"
    );
    assert_eq!(config.bedrock_model(), "anthropic.claude-3-5-sonnet-20240620-v1:0");
}

#[test]
fn test_written_file_is_flat_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::load_from(&path).unwrap();
    config.set(ConfigKey::OpenAiModel, "gpt-3.5-turbo").unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let table: toml::Table = toml::from_str(&content).unwrap();
    assert_eq!(table["openai_model"].as_str(), Some("gpt-3.5-turbo"));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_corrupt_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "provider = [unclosed").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseFailed(_)));
}
