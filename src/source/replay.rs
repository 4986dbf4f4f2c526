use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::hand::HandLandmarks;
use crate::source::LandmarkSource;

/// JSON Lines 形式のランドマーク記録を再生する
///
/// 1行1フレーム。`null` は手なし、それ以外は21点の `[x, y]` 配列。
pub struct ReplaySource {
    frames: Vec<Option<HandLandmarks>>,
    cursor: usize,
    repeat: bool,
}

impl ReplaySource {
    pub fn new(frames: Vec<Option<HandLandmarks>>, repeat: bool) -> Self {
        Self {
            frames,
            cursor: 0,
            repeat,
        }
    }

    pub fn open<P: AsRef<Path>>(path: P, repeat: bool) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read landmark file {}", path.display()))?;
        let frames = parse_frames(&content)
            .with_context(|| format!("invalid landmark file {}", path.display()))?;
        Ok(Self::new(frames, repeat))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// 画面外にはみ出した点はこの幅まで受け付ける (正規化座標)
const FRAME_MARGIN: f32 = 0.5;

fn in_range(v: f32) -> bool {
    (-FRAME_MARGIN..=1.0 + FRAME_MARGIN).contains(&v)
}

/// 空行は無視する
pub fn parse_frames(content: &str) -> Result<Vec<Option<HandLandmarks>>> {
    let mut frames = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let points: Option<Vec<[f32; 2]>> =
            serde_json::from_str(line).with_context(|| format!("line {}", i + 1))?;
        if let Some(points) = &points {
            if let Some(p) = points.iter().find(|p| !in_range(p[0]) || !in_range(p[1])) {
                bail!("line {}: landmark {:?} is not a normalized coordinate", i + 1, p);
            }
        }
        let frame = match points {
            None => None,
            Some(points) => match HandLandmarks::from_slice(&points) {
                Some(hand) => Some(hand),
                None => bail!("line {}: expected 21 landmarks, got {}", i + 1, points.len()),
            },
        };
        frames.push(frame);
    }
    Ok(frames)
}

impl LandmarkSource for ReplaySource {
    fn read_frame(&mut self) -> Result<Option<HandLandmarks>> {
        if self.cursor >= self.frames.len() {
            if !self.repeat || self.frames.is_empty() {
                bail!("end of landmark input");
            }
            self.cursor = 0;
        }
        let frame = self.frames[self.cursor].clone();
        self.cursor += 1;
        Ok(frame)
    }
}
