//! Display loop: drain the channel, update the HUD, draw, present.

use anyhow::Result;
use std::time::Instant;
use tracing::{error, info};

use crate::channel::{CommandReceiver, StopSignal};
use crate::config::Config;
use crate::hud::{HudController, HudState};
use crate::pacing::FramePacer;
use crate::render::{Background, Canvas, HudView, Surface};

/// 設定からHUDコントローラとビューを作る。背景画像が無ければエラー
pub fn build_hud(config: &Config) -> Result<(HudController, HudView)> {
    let (width, height) = (config.display.width, config.display.height);
    let background = Background::load(&config.display.background, width, height)?;
    let state = HudState::new(config.music.songs.clone())?;
    Ok((
        HudController::new(state, width, height),
        HudView::new(background),
    ))
}

pub struct DisplayLoop<S: Surface> {
    surface: S,
    rx: CommandReceiver,
    stop: StopSignal,
    controller: HudController,
    view: HudView,
    canvas: Canvas,
    pacer: FramePacer,
}

impl<S: Surface> DisplayLoop<S> {
    pub fn new(
        surface: S,
        rx: CommandReceiver,
        stop: StopSignal,
        controller: HudController,
        view: HudView,
        fps: u32,
    ) -> Self {
        let (width, height) = view.size();
        Self {
            surface,
            rx,
            stop,
            controller,
            view,
            canvas: Canvas::new(width, height),
            pacer: FramePacer::new("display", fps),
        }
    }

    /// 停止信号か描画先のクローズまで回り、最終的なHUD状態を返す
    pub fn run(mut self) -> Result<HudState> {
        info!("display loop started");

        while !self.stop.is_stopped() {
            if !self.surface.is_open() {
                info!("render surface closed, requesting stop");
                self.stop.stop();
                break;
            }
            self.pacer.begin_tick();
            let now = Instant::now();

            let events = self.rx.drain();
            self.controller.tick(events, now);
            self.view.draw(&mut self.canvas, &self.controller, now);

            if let Err(e) = self.surface.present(&self.canvas) {
                error!("present failed: {:#}", e);
                self.stop.stop();
                return Err(e);
            }

            self.pacer.end_tick();
        }

        info!("display loop stopped");
        Ok(self.controller.into_state())
    }
}
