//! Landmark input boundary.
//!
//! The hand-landmark model and camera live outside this crate; anything that
//! can hand over zero or one hand per tick implements [`LandmarkSource`].

pub mod replay;

use anyhow::Result;

use crate::hand::HandLandmarks;

pub use replay::ReplaySource;

pub trait LandmarkSource: Send {
    /// 1tick分のフレームを読む。`Ok(None)` は手が検出されなかったフレーム。
    /// エラーは読み取り失敗または入力終端で、センシングループを終了させる。
    fn read_frame(&mut self) -> Result<Option<HandLandmarks>>;
}
