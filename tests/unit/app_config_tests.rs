/*!
 * Tests for application configuration functionality
 */

use numblocks::app_config::{Config, LogLevel};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.preview_chars, 150);
    assert!(config.use_rtf_library);
    assert!(!config.normalize_txt_escaped_newlines);
    assert!(!config.copy_to_clipboard);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withZeroPreview_shouldFail() {
    let config = Config {
        preview_chars: 0,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

/// Test that missing keys fall back to defaults
#[test]
fn test_config_from_json_withPartialJson_shouldFillDefaults() {
    let config = Config::from_json(r#"{ "log_level": "debug", "copy_to_clipboard": true }"#).unwrap();

    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.copy_to_clipboard);
    assert_eq!(config.preview_chars, 150);
    assert!(config.use_rtf_library);
}

/// Test JSON round trip of the whole configuration
#[test]
fn test_config_serialization_withCustomValues_shouldRoundTrip() {
    let config = Config {
        preview_chars: 80,
        use_rtf_library: false,
        normalize_txt_escaped_newlines: true,
        copy_to_clipboard: false,
        log_level: LogLevel::Warn,
    };

    let json = serde_json::to_string_pretty(&config).unwrap();
    assert!(json.contains("\"log_level\": \"warn\""));
    assert_eq!(Config::from_json(&json).unwrap(), config);
}

/// Test log level parsing
#[test]
fn test_log_level_from_str_withKnownAndUnknownNames_shouldParse() {
    assert_eq!("TRACE".parse::<LogLevel>().unwrap(), LogLevel::Trace);
    assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
    assert!("verbose".parse::<LogLevel>().is_err());
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
}
