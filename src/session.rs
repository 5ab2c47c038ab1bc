use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::overlay::calib::CalibrationRect;

/// Durable operator state, kept independent of which simulation instance is
/// loaded so recalibration is not repeated per session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSession {
    pub api_base: Option<String>,
    pub calibration: Option<CalibrationRect>,
    pub home: Option<String>,
    pub taxi_start: Option<String>,
}

pub struct SessionStore {
    path: PathBuf,
    pub data: UiSession,
}

impl SessionStore {
    /// Missing file means first run; a corrupt file is logged and replaced
    /// with defaults rather than blocking startup.
    pub fn load(path: PathBuf) -> Self {
        let data = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<UiSession>(&raw) {
                Ok(mut session) => {
                    session.calibration = session.calibration.map(CalibrationRect::sanitized);
                    session
                }
                Err(error) => {
                    log::warn!(
                        "session file {} is not valid JSON ({error}); starting fresh",
                        path.display()
                    );
                    UiSession::default()
                }
            },
            Err(_) => UiSession::default(),
        };

        Self { path, data }
    }

    /// Synchronous write, called right after every committed edit so state
    /// surviving a reload always reflects the last commit, never an
    /// in-progress drag.
    pub fn save(&self) {
        if let Err(error) = self.try_save() {
            log::warn!("failed to persist session to {}: {error:#}", self.path.display());
        }
    }

    fn try_save(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.data).context("serialize session")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("write session file {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("travel-viz-test-{name}-{}.json", std::process::id()))
    }

    #[test]
    fn calibration_and_picks_survive_a_reload() {
        let path = temp_path("roundtrip");
        let mut store = SessionStore::load(path.clone());
        store.data.calibration = Some(CalibrationRect {
            x: 0.2,
            y: 0.3,
            w: 0.4,
            h: 0.5,
        });
        store.data.home = Some("A".to_owned());
        store.data.taxi_start = Some("B".to_owned());
        store.save();

        let reloaded = SessionStore::load(path.clone());
        assert_eq!(reloaded.data, store.data);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = SessionStore::load(temp_path("missing-never-created"));
        assert_eq!(store.data, UiSession::default());
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();
        let store = SessionStore::load(path.clone());
        assert_eq!(store.data, UiSession::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn out_of_range_calibration_is_sanitized_on_load() {
        let path = temp_path("sanitize");
        fs::write(
            &path,
            r#"{"calibration": {"x": 0.95, "y": -2.0, "w": 0.5, "h": 0.001}}"#,
        )
        .unwrap();
        let store = SessionStore::load(path.clone());
        let calib = store.data.calibration.unwrap();
        assert!(calib.x + calib.w <= 1.0 + f32::EPSILON);
        assert!(calib.y >= 0.0);
        assert!(calib.h >= crate::overlay::calib::MIN_EXTENT);
        let _ = fs::remove_file(path);
    }
}
