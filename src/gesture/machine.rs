//! Gesture state machine: palm hold arms command mode, fist rising edges are
//! counted, and the count is dispatched once the hand has been still for
//! [`DISPATCH_TIMEOUT`]. Pointer events stream while pointing in command mode.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::channel::CommandEvent;
use crate::hand::{Gesture, HandLandmarks, LandmarkIndex};

/// コマンドモードに入るのに必要な連続パーフレーム数
pub const ARMING_FRAMES: u32 = 30;

/// 最後のグーの立ち上がりからこれを超えて経過したら回数を送信
pub const DISPATCH_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmingState {
    Idle,
    Arming {
        hold_count: u32,
    },
    CommandMode {
        fist_count: u32,
        last_fist_edge: Option<Instant>,
    },
}

impl ArmingState {
    /// センシング側オーバーレイ用の案内文
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Idle | Self::Arming { .. } => "SHOW OPEN PALM FOR 1S TO BEGIN",
            Self::CommandMode { .. } => "WAITING FOR COMMAND...",
        }
    }

    pub fn is_command_mode(&self) -> bool {
        matches!(self, Self::CommandMode { .. })
    }
}

/// センシングループが所有するジェスチャー状態
pub struct GestureStateMachine {
    state: ArmingState,
    prev_gesture: Gesture,
    surface_width: u32,
    surface_height: u32,
}

impl GestureStateMachine {
    /// surface_*: ポインター座標をスケールする表示面のピクセルサイズ
    pub fn new(surface_width: u32, surface_height: u32) -> Self {
        Self {
            state: ArmingState::Idle,
            prev_gesture: Gesture::Unknown,
            surface_width,
            surface_height,
        }
    }

    pub fn state(&self) -> ArmingState {
        self.state
    }

    /// 1tick分の観測を処理し、発生したイベントを返す
    pub fn observe(
        &mut self,
        gesture: Gesture,
        hand: Option<&HandLandmarks>,
        now: Instant,
    ) -> Vec<CommandEvent> {
        let mut events = Vec::new();

        match self.state {
            ArmingState::Idle | ArmingState::Arming { .. } => {
                self.state = self.arming_step(gesture);
            }
            ArmingState::CommandMode {
                fist_count,
                last_fist_edge,
            } => {
                let (mut count, mut edge) = (fist_count, last_fist_edge);
                if gesture == Gesture::Fist && self.prev_gesture != Gesture::Fist {
                    count += 1;
                    edge = Some(now);
                    debug!("fist edge {}x", count);
                }
                if gesture == Gesture::IndexPoint {
                    if let Some(hand) = hand {
                        let (x, y) = hand
                            .get(LandmarkIndex::IndexTip)
                            .to_pixel(self.surface_width, self.surface_height);
                        events.push(CommandEvent::Pointer { x, y });
                    }
                }
                self.state = ArmingState::CommandMode {
                    fist_count: count,
                    last_fist_edge: edge,
                };
            }
        }

        if let Some(count) = self.due_dispatch(now) {
            info!("gesture count {} dispatched, returning to palm check", count);
            events.push(CommandEvent::Count(count));
            self.state = ArmingState::Idle;
        }

        self.prev_gesture = gesture;
        events
    }

    fn arming_step(&self, gesture: Gesture) -> ArmingState {
        if gesture != Gesture::OpenPalm {
            return ArmingState::Idle;
        }
        let hold_count = match self.state {
            ArmingState::Arming { hold_count } => hold_count + 1,
            _ => 1,
        };
        if hold_count >= ARMING_FRAMES {
            info!("palm held for {} frames, waiting for command", hold_count);
            ArmingState::CommandMode {
                fist_count: 0,
                last_fist_edge: None,
            }
        } else {
            ArmingState::Arming { hold_count }
        }
    }

    fn due_dispatch(&self, now: Instant) -> Option<u32> {
        match self.state {
            ArmingState::CommandMode {
                fist_count,
                last_fist_edge: Some(edge),
            } if fist_count > 0 && now.saturating_duration_since(edge) > DISPATCH_TIMEOUT => {
                Some(fist_count)
            }
            _ => None,
        }
    }
}
