use std::{collections::HashMap, env, fs, path::Path};
use serde::Deserialize;
use tracing::debug;
use crate::middleware::config::{MiddlewareConfig, MiddlewareType};

mod server;
mod upstream;
pub mod logging;
mod error;

pub use server::ServerSettings;
pub use upstream::UpstreamSettings;
pub use logging::{LogFormat, LogOutput, LogSettings};
pub use error::SettingsError;

pub type Result<T> = std::result::Result<T, SettingsError>;
pub use server::parse_env_var;

/// 설정 파일 없이 실행될 때 등록되는 기본 미들웨어 이름
pub const DEFAULT_MIDDLEWARE_NAME: &str = "xhtml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    // 서버 설정
    #[serde(default)]
    pub server: ServerSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    // 업스트림 설정
    pub upstream: UpstreamSettings,

    /// 미들웨어 설정
    #[serde(default)]
    pub middlewares: HashMap<String, MiddlewareConfig>,
}

impl Settings {
    /// `PROXY_CONFIG_FILE` 이 있으면 TOML 파일에서, 없으면 환경 변수에서 읽습니다.
    pub fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("PROXY_CONFIG_FILE") {
            Self::from_toml_file(&config_path)
        } else {
            Self::from_env()
        }
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("설정 파일 로드: {}", path.as_ref().display());
        let content = fs::read_to_string(&path).map_err(|e| SettingsError::FileError {
            path: path.as_ref().to_string_lossy().to_string(),
            error: e,
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| SettingsError::ParseError { source: e })?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_env() -> Result<Self> {
        let mut middlewares = HashMap::new();
        middlewares.insert(
            DEFAULT_MIDDLEWARE_NAME.to_string(),
            MiddlewareConfig::new(MiddlewareType::XhtmlContentType),
        );

        let settings = Self {
            server: ServerSettings::from_env()?,
            logging: LogSettings::from_env()?,
            upstream: UpstreamSettings::from_env()?,
            middlewares,
        };

        // 설정 생성 시점에 바로 검증
        settings.validate()?;
        Ok(settings)
    }

    /// 설정 유효성 검증
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;

        // 미들웨어 설정 검증
        for (name, middleware) in &self.middlewares {
            if !middleware.enabled {
                continue;
            }
            match middleware.middleware_type {
                MiddlewareType::XhtmlContentType => {
                    if let Some(key) = middleware.settings.keys().next() {
                        return Err(SettingsError::InvalidConfig(
                            format!("미들웨어 {} 에 알 수 없는 설정이 있습니다: {}", name, key)
                        ));
                    }
                }
            }
        }

        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_toml() {
        let toml_content = r#"
            [server]
            http_port = 9090
            bind_address = "127.0.0.1"

            [upstream]
            address = "127.0.0.1:3000"

            [logging]
            format = "json"
            level = "info"

            [middlewares.negotiate]
            middleware_type = "xhtml-content-type"
            order = 1
        "#;

        let settings = Settings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.server.http_port, 9090);
        assert_eq!(settings.server.socket_addr().to_string(), "127.0.0.1:9090");
        assert_eq!(settings.upstream.address.port(), 3000);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.middlewares.len(), 1);
    }

    #[test]
    fn test_missing_upstream_is_an_error() {
        let result = Settings::from_toml_str("[server]\nhttp_port = 8080\n");
        assert!(matches!(result, Err(SettingsError::ParseError { .. })));
    }

    #[test]
    fn test_unknown_middleware_setting_is_rejected() {
        let toml_content = r#"
            [upstream]
            address = "127.0.0.1:3000"

            [middlewares.negotiate]
            middleware_type = "xhtml-content-type"

            [middlewares.negotiate.settings]
            prefer = "xml"
        "#;

        assert!(matches!(
            Settings::from_toml_str(toml_content),
            Err(SettingsError::InvalidConfig(_))
        ));
    }
}
