use crate::settings::SettingsError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Settings Error: {0}")]
    SettingsError(#[from] SettingsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_error_converts() {
        let err: Error = SettingsError::InvalidConfig("bad".to_string()).into();
        assert!(matches!(err, Error::SettingsError(_)));
        assert!(err.to_string().contains("bad"));
    }
}
