// Integration tests for layered configuration files

use std::fs;

use korth_spirit::config::{AggregateConfig, ConfigError, ConfigLayer};
use korth_spirit::Coordinates;

#[test]
fn test_template_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    ConfigLayer::template().save(&path).unwrap();
    let loaded = ConfigLayer::load(&path).unwrap();

    assert_eq!(loaded, ConfigLayer::template());
}

#[test]
fn test_missing_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let config = AggregateConfig::new()
        .with_file(&dir.path().join("absent.toml"))
        .unwrap();

    assert_eq!(config.origins().count(), 0);
    assert!(matches!(config.bot_name(), Err(ConfigError::Missing(_))));
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "citizen_number = \"not a number\"\n").unwrap();

    let err = AggregateConfig::new().with_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_overrides_beat_file_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
bot_name = "FileBot"
citizen_number = 1234
password = "from-file"
world_name = "Alpha"

[world_coordinates]
x = 100
y = 0
z = 200
"#,
    )
    .unwrap();

    let overrides = ConfigLayer {
        world_name: Some("Beta".to_string()),
        ..Default::default()
    };
    let config = AggregateConfig::new()
        .with_layer("command line", overrides)
        .with_file(&path)
        .unwrap();

    let bot = config.resolve().unwrap();
    assert_eq!(bot.bot_name, "FileBot");
    assert_eq!(bot.citizen_number, 1234);
    assert_eq!(bot.world_name, "Beta");
    assert_eq!(bot.coordinates, Coordinates::new(100, 0, 200));
    assert_eq!(bot.universe.host, "auth.activeworlds.com");
}
