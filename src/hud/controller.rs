use std::time::Instant;

use tracing::info;

use crate::channel::CommandEvent;
use crate::filter::PointerSmoother;
use crate::hud::dwell::{ControlAction, DwellControl};
use crate::hud::state::HudState;

/// ドウェル操作ウィジェットの半径 (px)
pub const CONTROL_RADIUS: i32 = 60;

/// Pointerの途切れをこのtick数までは許容する (ループ間のレート差)
pub const POINTER_GRACE_TICKS: u32 = 1;

/// 表示ループが所有するHUDコントローラ
///
/// 毎tick、チャネルから取り出したイベントを到着順に処理し、
/// カーソルとドウェル操作を更新する。
pub struct HudController {
    state: HudState,
    smoother: PointerSmoother,
    cursor: Option<(i32, i32)>,
    last_pointer: Option<(i32, i32)>,
    missed_ticks: u32,
    controls: Vec<DwellControl>,
}

impl HudController {
    /// 表示面サイズからウィジェット配置を決める
    pub fn new(state: HudState, width: u32, height: u32) -> Self {
        let x = width as i32 - 150;
        let mid = height as i32 / 2;
        let controls = vec![
            DwellControl::new(ControlAction::CycleDriveMode, (x, mid - 90), CONTROL_RADIUS),
            DwellControl::new(ControlAction::TogglePlay, (x, mid + 90), CONTROL_RADIUS),
        ];
        Self {
            state,
            smoother: PointerSmoother::new(),
            cursor: None,
            last_pointer: None,
            missed_ticks: 0,
            controls,
        }
    }

    pub fn state(&self) -> &HudState {
        &self.state
    }

    pub fn into_state(self) -> HudState {
        self.state
    }

    /// 現在のカーソル位置。このtickにPointerが無ければNone
    pub fn cursor(&self) -> Option<(i32, i32)> {
        self.cursor
    }

    /// ドウェル判定に使うポインタ。
    /// Pointerが`POINTER_GRACE_TICKS`を超えて連続で途切れるまでは直近の位置を保持する
    pub fn active_pointer(&self) -> Option<(i32, i32)> {
        if self.missed_ticks <= POINTER_GRACE_TICKS {
            self.last_pointer
        } else {
            None
        }
    }

    pub fn controls(&self) -> &[DwellControl] {
        &self.controls
    }

    /// 1tick分の更新
    pub fn tick<I>(&mut self, events: I, now: Instant)
    where
        I: IntoIterator<Item = CommandEvent>,
    {
        let mut cursor = None;
        for event in events {
            match event {
                CommandEvent::Count(n) => {
                    self.state.apply_count(n, now);
                }
                CommandEvent::Pointer { x, y } => {
                    cursor = Some(self.smoother.apply(x, y));
                }
            }
        }
        self.cursor = cursor;
        match cursor {
            Some(point) => {
                self.last_pointer = Some(point);
                self.missed_ticks = 0;
            }
            None => self.missed_ticks = self.missed_ticks.saturating_add(1),
        }

        let pointer = self.active_pointer();
        for control in &mut self.controls {
            if !control.update(pointer, now) {
                continue;
            }
            let label = match control.action {
                ControlAction::CycleDriveMode => {
                    self.state.advance_drive_mode();
                    format!("MODE {}", self.state.drive_mode().name)
                }
                ControlAction::TogglePlay => {
                    self.state.toggle_playing();
                    let label = if self.state.is_playing() { "PLAY" } else { "PAUSE" };
                    label.to_string()
                }
            };
            info!("dwell control {:?} fired -> {}", control.action, label);
            self.state.notify(label, now);
        }

        self.state.expire_notification(now);
    }
}
