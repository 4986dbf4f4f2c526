use anyhow::Result;
use clap::Parser;
use std::time::{Duration, Instant};

use gesture_hud::gesture::GestureStateMachine;
use gesture_hud::hand::classify;
use gesture_hud::source::{LandmarkSource, ReplaySource};

/// ランドマーク記録を一定のフレーム間隔で再生し、ラベルとイベントを表示する
#[derive(Parser, Debug)]
#[command(name = "gesture_probe")]
struct Args {
    /// ランドマーク記録 (JSON Lines)
    path: String,

    /// 想定フレームレート
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Pointer座標のスケール先
    #[arg(long, default_value_t = 1280)]
    width: u32,
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// X軸反転
    #[arg(long)]
    mirror: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut source = ReplaySource::open(&args.path, false)?;
    let total = source.len();
    println!("Gesture Probe: {} frames @ {}fps", total, args.fps);

    let mut machine = GestureStateMachine::new(args.width, args.height);
    let frame_duration = Duration::from_secs_f64(1.0 / args.fps.max(1) as f64);
    let start = Instant::now();
    let mut prev_state = machine.state();

    for tick in 0..total {
        let hand = source.read_frame()?;
        let hand = if args.mirror { hand.map(|h| h.mirrored()) } else { hand };
        let now = start + frame_duration * tick as u32;

        let gesture = classify(hand.as_ref());
        let events = machine.observe(gesture, hand.as_ref(), now);

        let state = machine.state();
        if state.is_command_mode() != prev_state.is_command_mode() {
            println!("[{:>5}] -- {}", tick, state.status_text());
        }
        prev_state = state;

        for event in events {
            println!("[{:>5}] {:<12} {}", tick, gesture.as_str(), serde_json::to_string(&event)?);
        }
    }

    println!("Final state: {:?}", machine.state());
    Ok(())
}
