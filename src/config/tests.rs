use super::*;

#[test]
fn defaults_apply_when_nothing_is_configured() {
    let settings = Settings::from_raw(RawSettings::default()).unwrap();
    assert_eq!(settings.server.addr.to_string(), "127.0.0.1:3000");
    assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(30));
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert!(settings.database.url.is_none());
    assert!(settings.build_hook.url.is_none());
    assert!(settings.browser.chrome_executable.is_none());
    assert!(!settings.browser.no_sandbox);
}

#[test]
fn cli_overrides_take_precedence() {
    let cli = CliArgs {
        server_host: Some("0.0.0.0".to_string()),
        server_port: Some(8080),
        log_level: Some("debug".to_string()),
        log_json: Some(true),
        build_hook_url: Some("https://api.netlify.com/build_hooks/abc".to_string()),
        ..CliArgs::default()
    };

    let mut raw = RawSettings::default();
    raw.server.host = Some("127.0.0.1".to_string());
    raw.server.port = Some(3000);
    raw.apply_overrides(&cli);

    let settings = Settings::from_raw(raw).unwrap();
    assert_eq!(settings.server.addr.to_string(), "0.0.0.0:8080");
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert!(matches!(settings.logging.format, LogFormat::Json));
    assert_eq!(
        settings.build_hook.url.unwrap().as_str(),
        "https://api.netlify.com/build_hooks/abc"
    );
}

#[test]
fn invalid_log_level_is_rejected_with_its_key() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());
    let err = Settings::from_raw(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}

#[test]
fn malformed_build_hook_url_is_rejected() {
    let mut raw = RawSettings::default();
    raw.build_hook.url = Some("not a url".to_string());
    let err = Settings::from_raw(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "build_hook.url",
            ..
        }
    ));
}

#[test]
fn blank_build_hook_url_means_unconfigured() {
    let mut raw = RawSettings::default();
    raw.build_hook.url = Some("   ".to_string());
    let settings = Settings::from_raw(raw).unwrap();
    assert!(settings.build_hook.url.is_none());
}

#[test]
fn zero_pool_size_is_rejected() {
    let mut raw = RawSettings::default();
    raw.database.max_connections = Some(0);
    let err = Settings::from_raw(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "database.max_connections",
            ..
        }
    ));
}
