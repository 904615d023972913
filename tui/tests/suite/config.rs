#![expect(clippy::expect_used)]
use pretty_assertions::assert_eq;
use srcview_tui::config::Config;
use srcview_tui::config::ConfigError;
use srcview_tui::config::ConfigOverrides;
use tempfile::TempDir;

fn write_config(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).expect("write config");
    (dir, path)
}

#[test]
fn file_values_are_loaded() {
    let (dir, path) = write_config(
        r#"
server_url = "http://index.local:9000/"
vcs_link = "https://vcs.example/$file#L$line"
scroll_step = 5
log_dir = "logs"
"#,
    );
    let config = Config::load(ConfigOverrides {
        config_path: Some(path),
        ..ConfigOverrides::default()
    })
    .expect("load");

    assert_eq!(config.server_url, "http://index.local:9000/");
    assert_eq!(
        config.vcs_link.as_deref(),
        Some("https://vcs.example/$file#L$line")
    );
    assert_eq!(config.scroll_step, 5);
    assert_eq!(config.log_dir, std::path::PathBuf::from("logs"));
    drop(dir);
}

#[test]
fn command_line_overrides_win() {
    let (_dir, path) = write_config("server_url = \"http://from-file/\"\n");
    let config = Config::load(ConfigOverrides {
        config_path: Some(path),
        server_url: Some("http://from-cli/".into()),
        vcs_link: Some("https://cli/$file".into()),
    })
    .expect("load");

    assert_eq!(config.server_url, "http://from-cli/");
    assert_eq!(config.vcs_link.as_deref(), Some("https://cli/$file"));
}

#[test]
fn unknown_keys_are_rejected() {
    let (_dir, path) = write_config("colour = \"blue\"\n");
    let err = Config::load(ConfigOverrides {
        config_path: Some(path),
        ..ConfigOverrides::default()
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = Config::load(ConfigOverrides {
        config_path: Some(dir.path().join("absent.toml")),
        ..ConfigOverrides::default()
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
