use std::time::{Duration, Instant};

use tracing::{debug, info};

/// 直前に受理したコマンドからこの時間内のコマンドは無視する
pub const COMMAND_DEBOUNCE: Duration = Duration::from_millis(800);

/// 通知ラベルの表示時間 (前半フェードイン、後半フェードアウト)
pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(1000);

/// 走行モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveMode {
    pub name: &'static str,
    pub speed_kmh: u32,
}

pub const DRIVE_MODES: [DriveMode; 3] = [
    DriveMode { name: "ECO", speed_kmh: 60 },
    DriveMode { name: "COMFORT", speed_kmh: 80 },
    DriveMode { name: "SPORT", speed_kmh: 110 },
];

/// グー回数から決まるコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePlay,
    NextTrack,
    PreviousTrack,
    Unrecognized(u32),
}

impl Command {
    pub fn from_count(count: u32) -> Self {
        match count {
            1 => Self::TogglePlay,
            2 => Self::NextTrack,
            3 => Self::PreviousTrack,
            n => Self::Unrecognized(n),
        }
    }
}

/// コマンド適用結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied(Command),
    Debounced,
}

/// フェード付きの一時通知
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub label: String,
    pub shown_at: Instant,
}

impl Notification {
    /// 表示の不透明度 (0.0〜1.0)。期限切れならNone
    pub fn alpha(&self, now: Instant) -> Option<f32> {
        let elapsed = now.saturating_duration_since(self.shown_at);
        if elapsed > NOTIFICATION_DURATION {
            return None;
        }
        let half = NOTIFICATION_DURATION.as_secs_f32() / 2.0;
        let t = elapsed.as_secs_f32();
        let alpha = if t < half {
            t / half
        } else {
            (NOTIFICATION_DURATION.as_secs_f32() - t) / half
        };
        Some(alpha.clamp(0.0, 1.0))
    }
}

/// 表示ループが所有するHUD状態
#[derive(Debug, Clone)]
pub struct HudState {
    songs: Vec<String>,
    song_index: usize,
    playing: bool,
    drive_mode: usize,
    last_command_at: Option<Instant>,
    notification: Option<Notification>,
}

impl HudState {
    /// songs は空であってはならない
    pub fn new(songs: Vec<String>) -> anyhow::Result<Self> {
        if songs.is_empty() {
            anyhow::bail!("song list is empty");
        }
        Ok(Self {
            songs,
            song_index: 0,
            playing: true,
            drive_mode: 0,
            last_command_at: None,
            notification: None,
        })
    }

    pub fn song_index(&self) -> usize {
        self.song_index
    }

    pub fn current_song(&self) -> &str {
        &self.songs[self.song_index]
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn drive_mode(&self) -> DriveMode {
        DRIVE_MODES[self.drive_mode]
    }

    pub fn drive_mode_index(&self) -> usize {
        self.drive_mode
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// グー回数コマンドを適用 (デバウンス付き)
    pub fn apply_count(&mut self, count: u32, now: Instant) -> CommandOutcome {
        if let Some(last) = self.last_command_at {
            if now.saturating_duration_since(last) < COMMAND_DEBOUNCE {
                debug!("command {} ignored (debounce)", count);
                return CommandOutcome::Debounced;
            }
        }

        let command = Command::from_count(count);
        let label = match command {
            Command::TogglePlay => {
                self.toggle_playing();
                let label = if self.playing { "PLAY" } else { "PAUSE" };
                label.to_string()
            }
            Command::NextTrack => {
                self.song_index = (self.song_index + 1) % self.songs.len();
                "NEXT".to_string()
            }
            Command::PreviousTrack => {
                self.song_index = (self.song_index + self.songs.len() - 1) % self.songs.len();
                "PREV".to_string()
            }
            Command::Unrecognized(n) => format!("UNKNOWN {}", n),
        };
        info!("command {:?} -> {}", command, label);
        self.last_command_at = Some(now);
        self.notify(label, now);
        CommandOutcome::Applied(command)
    }

    pub fn toggle_playing(&mut self) {
        self.playing = !self.playing;
    }

    /// 走行モードを巡回的に進める
    pub fn advance_drive_mode(&mut self) {
        self.drive_mode = (self.drive_mode + 1) % DRIVE_MODES.len();
    }

    pub fn notify(&mut self, label: String, now: Instant) {
        self.notification = Some(Notification {
            label,
            shown_at: now,
        });
    }

    /// 期限切れの通知を破棄
    pub fn expire_notification(&mut self, now: Instant) {
        if let Some(n) = &self.notification {
            if n.alpha(now).is_none() {
                self.notification = None;
            }
        }
    }
}
