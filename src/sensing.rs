//! Sensing loop: landmark source → classifier → gesture state machine → channel.

use anyhow::Result;
use tracing::{debug, error, info};

use crate::channel::{CommandSender, StopSignal};
use crate::gesture::GestureStateMachine;
use crate::hand::classify;
use crate::pacing::FramePacer;
use crate::source::LandmarkSource;

pub struct SensingLoop<S: LandmarkSource> {
    source: S,
    machine: GestureStateMachine,
    tx: CommandSender,
    stop: StopSignal,
    pacer: FramePacer,
    mirror_x: bool,
}

impl<S: LandmarkSource> SensingLoop<S> {
    /// surface_*: Pointer座標のスケール先 (表示面のピクセルサイズ)
    pub fn new(
        source: S,
        tx: CommandSender,
        stop: StopSignal,
        fps: u32,
        surface_width: u32,
        surface_height: u32,
    ) -> Self {
        Self {
            source,
            machine: GestureStateMachine::new(surface_width, surface_height),
            tx,
            stop,
            pacer: FramePacer::new("sensing", fps),
            mirror_x: false,
        }
    }

    /// 分類前にX座標を反転する
    pub fn with_mirror_x(mut self, mirror_x: bool) -> Self {
        self.mirror_x = mirror_x;
        self
    }

    /// 停止信号、読み取り失敗、受信側の終了のいずれかまで回る。
    /// 読み取り失敗時は停止信号をセットしてエラーを返す。
    pub fn run(mut self) -> Result<()> {
        info!("sensing loop started");
        let mut prev_mode = false;

        while !self.stop.is_stopped() {
            let now = self.pacer.begin_tick();

            let hand = match self.source.read_frame() {
                Ok(hand) => hand,
                Err(e) => {
                    error!("landmark source failed: {:#}", e);
                    self.stop.stop();
                    return Err(e);
                }
            };
            let hand = if self.mirror_x {
                hand.map(|h| h.mirrored())
            } else {
                hand
            };

            let gesture = classify(hand.as_ref());
            let events = self.machine.observe(gesture, hand.as_ref(), now);

            let mode = self.machine.state().is_command_mode();
            if mode != prev_mode {
                debug!("{}", self.machine.state().status_text());
                prev_mode = mode;
            }

            for event in events {
                if self.tx.send(event).is_err() {
                    info!("display side closed, stopping sensing loop");
                    self.stop.stop();
                    return Ok(());
                }
            }

            self.pacer.end_tick();
        }

        info!("sensing loop stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{command_channel, CommandEvent};
    use crate::gesture::ARMING_FRAMES;
    use crate::hand::{HandLandmarks, Landmark, LandmarkIndex};
    use crate::source::ReplaySource;

    fn open_palm() -> HandLandmarks {
        let mut hand = HandLandmarks::new([Landmark::new(0.5, 0.5); LandmarkIndex::COUNT]);
        hand.points[LandmarkIndex::ThumbTip as usize].x = 0.4;
        for tip in [8, 12, 16, 20] {
            hand.points[tip].y = 0.3;
        }
        hand
    }

    fn pointing(x: f32, y: f32) -> HandLandmarks {
        let mut hand = HandLandmarks::new([Landmark::new(0.5, 0.5); LandmarkIndex::COUNT]);
        hand.points[LandmarkIndex::ThumbTip as usize].x = 0.6;
        for tip in [12, 16, 20] {
            hand.points[tip].y = 0.7;
        }
        // 先端がどこにあっても伸展と判定されるようPIPを下げておく
        hand.points[LandmarkIndex::IndexPip as usize].y = 0.95;
        hand.points[LandmarkIndex::IndexTip as usize] = Landmark::new(x, y);
        hand
    }

    #[test]
    fn test_end_of_input_sets_stop() {
        let (tx, _rx) = command_channel();
        let stop = StopSignal::new();
        let source = ReplaySource::new(vec![None, None], false);
        let result = SensingLoop::new(source, tx, stop.clone(), 1000, 100, 100).run();
        assert!(result.is_err());
        assert!(stop.is_stopped());
    }

    #[test]
    fn test_stop_signal_observed() {
        let (tx, _rx) = command_channel();
        let stop = StopSignal::new();
        stop.stop();
        let source = ReplaySource::new(vec![None], true);
        assert!(SensingLoop::new(source, tx, stop, 1000, 100, 100).run().is_ok());
    }

    #[test]
    fn test_pointer_events_reach_channel() {
        let (tx, rx) = command_channel();
        let stop = StopSignal::new();
        let mut frames: Vec<_> = (0..ARMING_FRAMES).map(|_| Some(open_palm())).collect();
        frames.push(Some(pointing(0.25, 0.5)));
        frames.push(Some(pointing(0.5, 0.5)));
        let source = ReplaySource::new(frames, false);
        let _ = SensingLoop::new(source, tx, stop, 1000, 200, 100).run();

        assert_eq!(
            rx.drain(),
            vec![
                CommandEvent::Pointer { x: 50, y: 50 },
                CommandEvent::Pointer { x: 100, y: 50 },
            ]
        );
    }

    #[test]
    fn test_mirror_x() {
        let (tx, rx) = command_channel();
        let stop = StopSignal::new();
        // 反転後にパー・人差し指になるよう親指を逆向きにしておく
        let mut palm = open_palm();
        palm.points[LandmarkIndex::ThumbTip as usize].x = 0.6;
        let mut point = pointing(0.25, 0.5);
        point.points[LandmarkIndex::ThumbTip as usize].x = 0.4;

        let mut frames: Vec<_> = (0..ARMING_FRAMES).map(|_| Some(palm.clone())).collect();
        frames.push(Some(point));
        let source = ReplaySource::new(frames, false);
        let _ = SensingLoop::new(source, tx, stop, 1000, 200, 100)
            .with_mirror_x(true)
            .run();

        assert_eq!(rx.drain(), vec![CommandEvent::Pointer { x: 150, y: 50 }]);
    }

    #[test]
    fn test_receiver_dropped_stops_loop() {
        let (tx, rx) = command_channel();
        drop(rx);
        let stop = StopSignal::new();
        let mut frames: Vec<_> = (0..ARMING_FRAMES).map(|_| Some(open_palm())).collect();
        frames.push(Some(pointing(0.5, 0.5)));
        frames.push(Some(pointing(0.5, 0.5)));
        let source = ReplaySource::new(frames, false);
        let result = SensingLoop::new(source, tx, stop.clone(), 1000, 200, 100).run();
        assert!(result.is_ok());
        assert!(stop.is_stopped());
    }
}
