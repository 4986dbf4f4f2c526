//! Sensing → display command channel and the shared stop signal.
//!
//! The channel is the only thing the two loops share besides [`StopSignal`].
//! It is unbounded and FIFO; the display side drains it once per tick.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

/// ジェスチャー状態機械から HUD へ送るイベント
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireEvent", into = "WireEvent")]
pub enum CommandEvent {
    /// デバウンス済みのグー回数 (1以上)
    Count(u32),
    /// 人差し指先端のピクセル座標
    Pointer { x: i32, y: i32 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum PointerTag {
    #[serde(rename = "pointer")]
    Pointer,
}

/// Wire shape: `3` or `["pointer", x, y]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum WireEvent {
    Count(u32),
    Pointer(PointerTag, i32, i32),
}

impl From<CommandEvent> for WireEvent {
    fn from(event: CommandEvent) -> Self {
        match event {
            CommandEvent::Count(n) => WireEvent::Count(n),
            CommandEvent::Pointer { x, y } => WireEvent::Pointer(PointerTag::Pointer, x, y),
        }
    }
}

impl TryFrom<WireEvent> for CommandEvent {
    type Error = anyhow::Error;

    fn try_from(wire: WireEvent) -> Result<Self> {
        match wire {
            WireEvent::Count(0) => bail!("command count must be positive"),
            WireEvent::Count(n) => Ok(CommandEvent::Count(n)),
            WireEvent::Pointer(_, x, y) => Ok(CommandEvent::Pointer { x, y }),
        }
    }
}

/// 送信側 (センシングループ専用)
pub struct CommandSender {
    tx: mpsc::Sender<CommandEvent>,
}

impl CommandSender {
    /// 非ブロッキング送信。受信側が既に終了していればエラー
    pub fn send(&self, event: CommandEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| anyhow!("command receiver disconnected"))
    }
}

/// 受信側 (表示ループ専用)
pub struct CommandReceiver {
    rx: mpsc::Receiver<CommandEvent>,
}

impl CommandReceiver {
    /// 溜まっているイベントを到着順にすべて取り出す。空なら空のVec
    pub fn drain(&self) -> Vec<CommandEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// 無制限FIFOのコマンドチャネルを作成
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::channel();
    (CommandSender { tx }, CommandReceiver { rx })
}

/// 両ループが毎tick先頭で確認する協調停止フラグ
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// 停止を要求 (冪等)
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empty() {
        let (_tx, rx) = command_channel();
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_drain_preserves_order() {
        let (tx, rx) = command_channel();
        tx.send(CommandEvent::Pointer { x: 1, y: 2 }).unwrap();
        tx.send(CommandEvent::Count(3)).unwrap();
        tx.send(CommandEvent::Pointer { x: 4, y: 5 }).unwrap();

        let events = rx.drain();
        assert_eq!(
            events,
            vec![
                CommandEvent::Pointer { x: 1, y: 2 },
                CommandEvent::Count(3),
                CommandEvent::Pointer { x: 4, y: 5 },
            ]
        );
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = command_channel();
        drop(rx);
        assert!(tx.send(CommandEvent::Count(1)).is_err());
    }

    #[test]
    fn test_drain_after_sender_dropped() {
        let (tx, rx) = command_channel();
        tx.send(CommandEvent::Count(2)).unwrap();
        drop(tx);
        assert_eq!(rx.drain(), vec![CommandEvent::Count(2)]);
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_stop_signal_shared() {
        let stop = StopSignal::new();
        let other = stop.clone();
        assert!(!other.is_stopped());
        stop.stop();
        stop.stop();
        assert!(other.is_stopped());
    }

    #[test]
    fn test_wire_shape() {
        let count = serde_json::to_string(&CommandEvent::Count(3)).unwrap();
        assert_eq!(count, "3");
        let pointer = serde_json::to_string(&CommandEvent::Pointer { x: 10, y: 20 }).unwrap();
        assert_eq!(pointer, r#"["pointer",10,20]"#);
    }

    #[test]
    fn test_wire_parse() {
        let event: CommandEvent = serde_json::from_str("2").unwrap();
        assert_eq!(event, CommandEvent::Count(2));
        let event: CommandEvent = serde_json::from_str(r#"["pointer", 5, 6]"#).unwrap();
        assert_eq!(event, CommandEvent::Pointer { x: 5, y: 6 });
    }

    #[test]
    fn test_wire_rejects_invalid() {
        assert!(serde_json::from_str::<CommandEvent>("0").is_err());
        assert!(serde_json::from_str::<CommandEvent>(r#"["cursor", 5, 6]"#).is_err());
    }
}
