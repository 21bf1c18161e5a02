use serde::Deserialize;
use std::env;
use std::net::SocketAddr;
use super::SettingsError;

/// 요청을 전달할 업스트림 서버 설정
#[derive(Clone, Debug, Deserialize)]
pub struct UpstreamSettings {
    /// 업스트림 주소 (예: 127.0.0.1:3000)
    pub address: SocketAddr,
}

impl UpstreamSettings {
    pub fn new(address: SocketAddr) -> Self {
        Self { address }
    }

    pub fn from_env() -> Result<Self, SettingsError> {
        let value = env::var("PROXY_UPSTREAM").map_err(|_| SettingsError::EnvVarMissing {
            var_name: "PROXY_UPSTREAM".to_string(),
        })?;

        let address = value.parse().map_err(|e: std::net::AddrParseError| SettingsError::EnvVarInvalid {
            var_name: "PROXY_UPSTREAM".to_string(),
            value: value.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self { address })
    }
}
