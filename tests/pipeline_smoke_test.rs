//! センシング → チャネル → 表示 の結合テスト

use std::fs;
use std::path::PathBuf;
use std::thread;

use gesture_hud::channel::{command_channel, CommandEvent, StopSignal};
use gesture_hud::display::DisplayLoop;
use gesture_hud::hud::{HudController, HudState};
use gesture_hud::render::{Background, HeadlessSurface, HudView};
use gesture_hud::sensing::SensingLoop;
use gesture_hud::source::ReplaySource;

const W: u32 = 320;
const H: u32 = 180;

fn neutral() -> Vec<[f32; 2]> {
    vec![[0.5, 0.5]; 21]
}

fn palm_line() -> String {
    let mut points = neutral();
    points[4] = [0.4, 0.5];
    for tip in [8, 12, 16, 20] {
        points[tip] = [0.5, 0.3];
    }
    serde_json::to_string(&points).unwrap()
}

fn fist_line() -> String {
    let mut points = neutral();
    points[4] = [0.6, 0.5];
    for tip in [8, 12, 16, 20] {
        points[tip] = [0.5, 0.7];
    }
    serde_json::to_string(&points).unwrap()
}

/// 30フレームのパー、グー2回、その後1.2秒以上の手なし (1000fps想定)
fn two_fist_recording() -> String {
    let mut lines = Vec::new();
    for _ in 0..30 {
        lines.push(palm_line());
    }
    lines.push(fist_line());
    lines.push(palm_line());
    lines.push(fist_line());
    for _ in 0..1200 {
        lines.push("null".to_string());
    }
    lines.join("\n")
}

fn write_recording(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("gesture_hud_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("landmarks.jsonl");
    fs::write(&path, content).unwrap();
    path
}

fn controller() -> HudController {
    let songs = vec!["One".to_string(), "Two".to_string(), "Three".to_string()];
    HudController::new(HudState::new(songs).unwrap(), W, H)
}

#[test]
fn test_sensing_emits_count_and_stops_at_end_of_input() {
    let path = write_recording("sensing", &two_fist_recording());
    let source = ReplaySource::open(&path, false).unwrap();
    let (tx, rx) = command_channel();
    let stop = StopSignal::new();

    let result = SensingLoop::new(source, tx, stop.clone(), 1000, W, H).run();

    assert!(result.is_err());
    assert!(stop.is_stopped());
    let counts: Vec<_> = rx
        .drain()
        .into_iter()
        .filter(|e| matches!(e, CommandEvent::Count(_)))
        .collect();
    assert_eq!(counts, vec![CommandEvent::Count(2)]);
}

#[test]
fn test_display_applies_count_from_sensing_thread() {
    let path = write_recording("pipeline", &two_fist_recording());
    let source = ReplaySource::open(&path, false).unwrap();
    let (tx, rx) = command_channel();
    let stop = StopSignal::new();

    let sensing_stop = stop.clone();
    let handle =
        thread::spawn(move || SensingLoop::new(source, tx, sensing_stop, 1000, W, H).run());

    let view = HudView::new(Background::solid(0x202020, W as usize, H as usize));
    let mut surface = HeadlessSurface::new(u64::MAX);
    let state = DisplayLoop::new(&mut surface, rx, stop.clone(), controller(), view, 200)
        .run()
        .unwrap();

    assert!(handle.join().unwrap().is_err());
    assert!(stop.is_stopped());
    assert!(surface.presented() > 0);
    // 2回 → 次の曲
    assert_eq!(state.song_index(), 1);
    assert!(state.is_playing());
}

#[test]
fn test_closing_surface_stops_sensing() {
    let path = write_recording("close", &two_fist_recording());
    let source = ReplaySource::open(&path, true).unwrap();
    let (tx, rx) = command_channel();
    let stop = StopSignal::new();

    let sensing_stop = stop.clone();
    let handle = thread::spawn(move || SensingLoop::new(source, tx, sensing_stop, 200, W, H).run());

    let view = HudView::new(Background::solid(0, W as usize, H as usize));
    let state = DisplayLoop::new(HeadlessSurface::new(5), rx, stop.clone(), controller(), view, 200)
        .run()
        .unwrap();

    assert!(stop.is_stopped());
    assert!(handle.join().unwrap().is_ok());
    assert_eq!(state.song_index(), 0);
}
