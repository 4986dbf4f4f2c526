use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub music: MusicConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// センシングループの目標FPS
    #[serde(default = "default_fps")]
    pub sensing_fps: u32,
    /// 表示ループの目標FPS
    #[serde(default = "default_fps")]
    pub display_fps: u32,
    /// センシング開始から表示ループ開始までの待ち (ms)
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// 背景画像のパス
    #[serde(default = "default_background")]
    pub background: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// ランドマーク記録 (JSON Lines)
    #[serde(default = "default_source_path")]
    pub path: String,
    /// 終端で先頭に戻る
    #[serde(default)]
    pub repeat: bool,
    /// X軸反転
    #[serde(default)]
    pub mirror_x: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MusicConfig {
    #[serde(default = "default_songs")]
    pub songs: Vec<String>,
}

fn default_fps() -> u32 { 30 }
fn default_startup_delay_ms() -> u64 { 1000 }
fn default_title() -> String { "Gesture HUD".to_string() }
fn default_width() -> u32 { 1280 }
fn default_height() -> u32 { 720 }
fn default_background() -> String { "assets/background.png".to_string() }
fn default_source_path() -> String { "landmarks.jsonl".to_string() }
fn default_songs() -> Vec<String> {
    vec![
        "Never Gonna Give You Up".to_string(),
        "Blinding Lights".to_string(),
        "Interstellar OST".to_string(),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sensing_fps: default_fps(),
            display_fps: default_fps(),
            startup_delay_ms: default_startup_delay_ms(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            background: default_background(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
            repeat: false,
            mirror_x: false,
        }
    }
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            songs: default_songs(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 読めなければデフォルト設定
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("{} not found, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!("loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("error parsing {}: {:#}. using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.music.songs.is_empty() {
            anyhow::bail!("[music] songs must not be empty");
        }
        if self.display.width == 0 || self.display.height == 0 {
            anyhow::bail!("[display] width and height must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.app.sensing_fps, 30);
        assert_eq!(config.display.width, 1280);
        assert_eq!(config.music.songs.len(), 3);
        assert!(!config.source.repeat);
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse(
            r#"
            [display]
            width = 640

            [source]
            path = "demo.jsonl"
            mirror_x = true
            "#,
        )
        .unwrap();
        assert_eq!(config.display.width, 640);
        assert_eq!(config.display.height, 720);
        assert_eq!(config.source.path, "demo.jsonl");
        assert!(config.source.mirror_x);
        assert_eq!(config.app.startup_delay_ms, 1000);
    }

    #[test]
    fn test_empty_song_list_rejected() {
        assert!(Config::parse("[music]\nsongs = []\n").is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("no/such/config.toml");
        assert_eq!(config.display.height, 720);
    }
}
