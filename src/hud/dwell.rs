//! Dwell activation: hover a pointer over a control long enough and it fires.
//!
//! A control fires at most once per visit. Leaving the hit region cancels an
//! unfinished dwell and re-arms the control.

use std::time::{Duration, Instant};

/// 発火までのホバー時間
pub const DWELL_DURATION: Duration = Duration::from_millis(1000);

/// 1コントロール分のドウェルタイマー
#[derive(Debug, Clone)]
pub struct DwellTimer {
    hover_started_at: Option<Instant>,
    completed: bool,
    armed: bool,
    duration: Duration,
}

impl DwellTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            hover_started_at: None,
            completed: false,
            armed: true,
            duration,
        }
    }

    /// 1tick分の更新。発火したtickだけtrueを返す
    pub fn update(&mut self, inside: bool, now: Instant) -> bool {
        if !inside {
            self.hover_started_at = None;
            self.completed = false;
            self.armed = true;
            return false;
        }

        let started = *self.hover_started_at.get_or_insert(now);
        if self.armed
            && !self.completed
            && now.saturating_duration_since(started) >= self.duration
        {
            self.completed = true;
            self.armed = false;
            return true;
        }
        false
    }

    /// 進捗 (0.0〜1.0)。ホバー中かつ未発火の時だけSome
    pub fn progress(&self, now: Instant) -> Option<f32> {
        let started = self.hover_started_at?;
        if self.completed {
            return None;
        }
        let elapsed = now.saturating_duration_since(started).as_secs_f32();
        Some((elapsed / self.duration.as_secs_f32()).min(1.0))
    }

    pub fn is_hovering(&self) -> bool {
        self.hover_started_at.is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl Default for DwellTimer {
    fn default() -> Self {
        Self::new(DWELL_DURATION)
    }
}

/// ドウェル操作で発火するアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// 走行モードを巡回
    CycleDriveMode,
    /// 再生/一時停止
    TogglePlay,
}

/// 円形ヒット領域を持つドウェル操作ウィジェット
#[derive(Debug, Clone)]
pub struct DwellControl {
    pub action: ControlAction,
    pub center: (i32, i32),
    pub radius: i32,
    timer: DwellTimer,
}

impl DwellControl {
    pub fn new(action: ControlAction, center: (i32, i32), radius: i32) -> Self {
        Self {
            action,
            center,
            radius,
            timer: DwellTimer::default(),
        }
    }

    pub fn contains(&self, point: (i32, i32)) -> bool {
        let dx = point.0 as i64 - self.center.0 as i64;
        let dy = point.1 as i64 - self.center.1 as i64;
        let r = self.radius as i64;
        dx * dx + dy * dy <= r * r
    }

    /// カーソル位置で更新。カーソル無しは領域外として扱う
    pub fn update(&mut self, cursor: Option<(i32, i32)>, now: Instant) -> bool {
        let inside = cursor.map(|p| self.contains(p)).unwrap_or(false);
        self.timer.update(inside, now)
    }

    pub fn timer(&self) -> &DwellTimer {
        &self.timer
    }
}
