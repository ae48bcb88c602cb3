use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::MediaResult;
use crate::movie::encode::DEFAULT_FPS;

/// Session settings. Every field has a default, so a config file may name only what it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Base directory for relative file names. `None` means the working directory.
    pub media_folder: Option<PathBuf>,
    /// Wrap channel values modulo 256 instead of clamping them.
    pub wrap_levels: bool,
    pub frames_per_second: u32,
    pub ffmpeg: PathBuf,
    pub ffplay: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            media_folder: None,
            wrap_levels: false,
            frames_per_second: DEFAULT_FPS,
            ffmpeg: PathBuf::from("ffmpeg"),
            ffplay: PathBuf::from("ffplay"),
        }
    }
}

impl MediaConfig {
    pub fn from_json_path(path: &Path) -> MediaResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let r = BufReader::new(f);
        let config: Self = serde_json::from_reader(r).with_context(|| "parse config JSON")?;
        Ok(config)
    }

    /// Defaults, then the JSON file if one is given, then the `MEDIACOMP_*` environment.
    pub fn load(path: Option<&Path>) -> MediaResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_json_path(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override fields from `MEDIACOMP_*` variables. Values that fail to parse are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("MEDIACOMP_MEDIA_FOLDER").filter(|v| !v.is_empty()) {
            self.media_folder = Some(PathBuf::from(dir));
        }
        if let Some(wrap) = lookup("MEDIACOMP_WRAP_LEVELS").and_then(|v| parse_flag(&v)) {
            self.wrap_levels = wrap;
        }
        if let Some(p) = lookup("MEDIACOMP_FFMPEG").filter(|v| !v.is_empty()) {
            self.ffmpeg = PathBuf::from(p);
        }
        if let Some(p) = lookup("MEDIACOMP_FFPLAY").filter(|v| !v.is_empty()) {
            self.ffplay = PathBuf::from(p);
        }
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.json");
        std::fs::write(&path, r#"{ "wrap_levels": true, "frames_per_second": 24 }"#).unwrap();
        let cfg = MediaConfig::from_json_path(&path).unwrap();
        assert!(cfg.wrap_levels);
        assert_eq!(cfg.frames_per_second, 24);
        assert_eq!(cfg.ffmpeg, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn bad_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.json");
        std::fs::write(&path, "{ nope").unwrap();
        let err = MediaConfig::from_json_path(&path).unwrap_err();
        assert!(err.to_string().contains("parse config JSON"));
    }

    #[test]
    fn environment_overrides_and_ignores_garbage() {
        let mut cfg = MediaConfig::default();
        cfg.apply_env(|key| match key {
            "MEDIACOMP_MEDIA_FOLDER" => Some("/srv/media".to_string()),
            "MEDIACOMP_WRAP_LEVELS" => Some("yes".to_string()),
            "MEDIACOMP_FFMPEG" => Some(String::new()),
            "MEDIACOMP_FFPLAY" => Some("/opt/bin/ffplay".to_string()),
            _ => None,
        });
        assert_eq!(cfg.media_folder, Some(PathBuf::from("/srv/media")));
        assert!(cfg.wrap_levels);
        assert_eq!(cfg.ffplay, PathBuf::from("/opt/bin/ffplay"));
        assert_eq!(cfg.ffmpeg, PathBuf::from("ffmpeg"));
    }
}
