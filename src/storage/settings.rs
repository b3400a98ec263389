use std::path::Path;

use crate::error::AppError;
use crate::models::settings::UploaderSettings;

pub const SETTINGS_FILE: &str = "uploader.json";

/// Read widget settings. Returns defaults if the file is missing or unreadable
/// as settings.
pub fn load_settings(path: &Path) -> crate::error::Result<UploaderSettings> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(UploaderSettings::default());
        }
        Err(e) => return Err(AppError::Storage(e.to_string())),
    };
    let settings = serde_json::from_str(&raw).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed settings in {}: {}", path.display(), e);
        UploaderSettings::default()
    });
    Ok(settings)
}

/// Save widget settings. Persists to disk immediately.
pub fn save_settings(path: &Path, settings: &UploaderSettings) -> crate::error::Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json).map_err(|e| AppError::Storage(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(settings, UploaderSettings::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let original = UploaderSettings {
            accepted_types: "image/*".into(),
            max_files: Some(5),
            max_file_size: None,
            ..UploaderSettings::default()
        };
        save_settings(&path, &original).unwrap();

        let restored = load_settings(&path).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn saved_file_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        save_settings(&path, &UploaderSettings::default()).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"acceptedTypes\""), "got: {}", raw);
    }

    #[test]
    fn malformed_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings(&path).unwrap(), UploaderSettings::default());
    }

    #[test]
    fn save_into_missing_directory_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(SETTINGS_FILE);
        match save_settings(&path, &UploaderSettings::default()) {
            Err(AppError::Storage(_)) => {}
            other => panic!("Expected AppError::Storage, got: {:?}", other),
        }
    }
}
