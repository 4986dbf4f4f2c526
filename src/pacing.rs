use std::time::{Duration, Instant};

use tracing::debug;

/// 固定レートのtickスケジューラ
///
/// 待機はtickの末尾 (次tickの先頭) でのみ行い、計算の途中では止まらない。
pub struct FramePacer {
    name: &'static str,
    frame_duration: Duration,
    tick_start: Instant,
    frame_count: u32,
    fps_timer: Instant,
}

impl FramePacer {
    pub fn new(name: &'static str, fps: u32) -> Self {
        let now = Instant::now();
        Self {
            name,
            frame_duration: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            tick_start: now,
            frame_count: 0,
            fps_timer: now,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// tick開始時刻を記録して返す
    pub fn begin_tick(&mut self) -> Instant {
        self.tick_start = Instant::now();
        self.tick_start
    }

    /// 残り時間だけ眠る。1秒ごとにFPSをログ
    pub fn end_tick(&mut self) {
        self.frame_count += 1;
        let elapsed = self.fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            debug!("{} FPS: {:.1}", self.name, self.frame_count as f32 / elapsed);
            self.frame_count = 0;
            self.fps_timer = Instant::now();
        }

        let spent = self.tick_start.elapsed();
        if spent < self.frame_duration {
            std::thread::sleep(self.frame_duration - spent);
        }
    }
}
