use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::models::RelaySettings;

const SETTINGS_FILE: &str = "relay.json";

pub fn get_settings_file_path() -> PathBuf {
    PathBuf::from(SETTINGS_FILE)
}

/// Loads settings from `path`. A missing or unreadable file falls back to
/// the defaults so the relay can always start.
pub fn load_relay_settings(path: &Path) -> RelaySettings {
    if !path.exists() {
        info!(path = %path.display(), "no settings file found, using defaults");
        return RelaySettings::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<RelaySettings>(&content) {
            Ok(settings) => {
                info!(
                    path = %path.display(),
                    parse_mode = ?settings.parse_mode,
                    topic = %settings.kafka.topic,
                    "loaded settings"
                );
                settings
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "error parsing settings JSON, using defaults"
                );
                RelaySettings::default()
            }
        },
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "error reading settings file, using defaults"
            );
            RelaySettings::default()
        }
    }
}

pub fn save_relay_settings(path: &Path, settings: &RelaySettings) -> io::Result<()> {
    let json_content = serde_json::to_string_pretty(settings).map_err(|e| {
        io::Error::new(io::ErrorKind::Other, format!("JSON serialization error: {}", e))
    })?;

    let mut file = fs::File::create(path)?;
    file.write_all(json_content.as_bytes())?;
    file.flush()?;

    info!(path = %path.display(), "saved settings");
    Ok(())
}
