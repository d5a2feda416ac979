/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use log::LevelFilter;
use srtgears::app_config::{Config, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.log_level, LogLevel::Info);
    assert!(!config.debug);
    assert!(!config.force_overwrite);
}

/// Test that an empty JSON object is a complete configuration
#[test]
fn test_deserialize_withEmptyObject_shouldUseDefaults() -> Result<()> {
    let config: Config = serde_json::from_str("{}")?;
    assert_eq!(config, Config::default());
    Ok(())
}

/// Test loading a configuration file
#[test]
fn test_from_file_withValidJson_shouldLoadValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "log_level": "debug", "debug": true, "force_overwrite": true }"#,
    )?;

    let config = Config::from_file(&path)?;

    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.debug);
    assert!(config.force_overwrite);
    Ok(())
}

/// Test that malformed or missing files are errors
#[test]
fn test_from_file_withInvalidInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let bad = common::create_test_file(temp_dir.path(), "bad.json", r#"{ "log_level": "loud" }"#)?;

    assert!(Config::from_file(&bad).is_err());
    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());
    Ok(())
}

/// Test that debug mode wins over a quieter configured level
#[test]
fn test_level_filter_withDebugAndErrorLevel_shouldUseDebug() -> Result<()> {
    let config: Config = serde_json::from_str(r#"{ "log_level": "error", "debug": true }"#)?;

    assert_eq!(config.log_level, LogLevel::Error);
    assert_eq!(config.level_filter(), LevelFilter::Debug);
    assert!(config.read_options().debug);
    Ok(())
}

/// Test that a configuration file combining debug with the error level loads
#[test]
fn test_from_file_withDebugAndErrorLevel_shouldLoad() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "log_level": "error", "debug": true }"#,
    )?;

    let config = Config::from_file(&path)?;

    assert_eq!(config.level_filter(), LevelFilter::Debug);
    Ok(())
}

/// Test the effective log level
#[test]
fn test_level_filter_withDebug_shouldRaiseToDebug() {
    let mut config = Config::default();
    assert_eq!(config.level_filter(), LevelFilter::Info);

    config.debug = true;
    assert_eq!(config.level_filter(), LevelFilter::Debug);

    config.log_level = LogLevel::Trace;
    assert_eq!(config.level_filter(), LevelFilter::Trace);
}

/// Test that the debug flag is threaded to the parser options
#[test]
fn test_read_options_withDebug_shouldEnableDiagnostics() {
    let config = Config {
        debug: true,
        ..Default::default()
    };
    assert!(config.read_options().debug);
    assert!(!Config::default().read_options().debug);
}

/// Test serialization uses lowercase log level names
#[test]
fn test_serialize_withLogLevel_shouldUseLowercase() -> Result<()> {
    let json = serde_json::to_string(&Config::default())?;
    assert!(json.contains(r#""log_level":"info""#));
    Ok(())
}
