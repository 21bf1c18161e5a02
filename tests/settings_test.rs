use std::io::Write;
use serial_test::serial;
use tempfile::NamedTempFile;
use xhtml_content_type::middleware::MiddlewareType;
use xhtml_content_type::settings::{
    LogFormat, LogOutput, Settings, SettingsError, DEFAULT_MIDDLEWARE_NAME,
};

const VARS: [&str; 7] = [
    "PROXY_CONFIG_FILE",
    "PROXY_HTTP_PORT",
    "PROXY_BIND_ADDRESS",
    "PROXY_UPSTREAM",
    "PROXY_LOG_FORMAT",
    "PROXY_LOG_LEVEL",
    "PROXY_LOG_OUTPUT",
];

fn cleanup_env() {
    for var in VARS.iter() {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_settings_from_env_defaults() {
    cleanup_env();
    std::env::set_var("PROXY_UPSTREAM", "127.0.0.1:3000");

    let settings = Settings::load().unwrap();
    assert_eq!(settings.server.http_port, 8080);
    assert_eq!(settings.server.socket_addr().to_string(), "0.0.0.0:8080");
    assert_eq!(settings.upstream.address.to_string(), "127.0.0.1:3000");
    assert_eq!(settings.logging.format, LogFormat::Text);
    assert_eq!(settings.logging.output, LogOutput::Stdout);

    let default = settings.middlewares.get(DEFAULT_MIDDLEWARE_NAME).unwrap();
    assert_eq!(default.middleware_type, MiddlewareType::XhtmlContentType);
    assert!(default.enabled);

    cleanup_env();
}

#[test]
#[serial]
fn test_settings_from_env_custom_values() {
    cleanup_env();
    std::env::set_var("PROXY_UPSTREAM", "10.0.0.5:8000");
    std::env::set_var("PROXY_HTTP_PORT", "9000");
    std::env::set_var("PROXY_BIND_ADDRESS", "127.0.0.1");
    std::env::set_var("PROXY_LOG_FORMAT", "json");
    std::env::set_var("PROXY_LOG_LEVEL", "debug");
    std::env::set_var("PROXY_LOG_OUTPUT", "/tmp/xhtml.log");

    let settings = Settings::from_env().unwrap();
    assert_eq!(settings.server.socket_addr().to_string(), "127.0.0.1:9000");
    assert_eq!(settings.logging.format, LogFormat::Json);
    assert_eq!(settings.logging.level, tracing::Level::DEBUG);
    assert_eq!(settings.logging.output, LogOutput::File("/tmp/xhtml.log".to_string()));

    cleanup_env();
}

#[test]
#[serial]
fn test_missing_upstream_env() {
    cleanup_env();

    let result = Settings::from_env();
    assert!(matches!(
        result,
        Err(SettingsError::EnvVarMissing { ref var_name }) if var_name == "PROXY_UPSTREAM"
    ));
}

#[test]
#[serial]
fn test_invalid_env_values() {
    cleanup_env();
    std::env::set_var("PROXY_UPSTREAM", "not-an-address");
    assert!(matches!(Settings::from_env(), Err(SettingsError::EnvVarInvalid { .. })));

    std::env::set_var("PROXY_UPSTREAM", "127.0.0.1:3000");
    std::env::set_var("PROXY_HTTP_PORT", "0");
    assert!(matches!(Settings::from_env(), Err(SettingsError::EnvVarInvalid { .. })));

    std::env::set_var("PROXY_HTTP_PORT", "8080");
    std::env::set_var("PROXY_LOG_LEVEL", "loud");
    assert!(matches!(Settings::from_env(), Err(SettingsError::EnvVarInvalid { .. })));

    cleanup_env();
}

#[test]
#[serial]
fn test_settings_from_config_file() {
    cleanup_env();

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [server]
        http_port = 8181

        [upstream]
        address = "127.0.0.1:4000"

        [middlewares.negotiate]
        middleware_type = "xhtml-content-type"
        order = 10

        [middlewares.disabled]
        middleware_type = "xhtml-content-type"
        enabled = false
        "#
    )
    .unwrap();

    std::env::set_var("PROXY_CONFIG_FILE", file.path());
    let settings = Settings::load().unwrap();
    assert_eq!(settings.server.http_port, 8181);
    assert_eq!(settings.upstream.address.port(), 4000);
    assert_eq!(settings.middlewares.len(), 2);
    assert_eq!(settings.middlewares["negotiate"].order, 10);
    assert!(!settings.middlewares["disabled"].enabled);

    cleanup_env();
}

#[test]
#[serial]
fn test_missing_config_file() {
    cleanup_env();
    std::env::set_var("PROXY_CONFIG_FILE", "/nonexistent/xhtml.toml");

    assert!(matches!(Settings::load(), Err(SettingsError::FileError { .. })));

    cleanup_env();
}
