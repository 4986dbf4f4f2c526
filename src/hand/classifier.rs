use crate::hand::landmark::{HandLandmarks, LandmarkIndex};

/// 指先ランドマーク (親指, 人差し指, 中指, 薬指, 小指)
const TIP_INDICES: [LandmarkIndex; 5] = [
    LandmarkIndex::ThumbTip,
    LandmarkIndex::IndexTip,
    LandmarkIndex::MiddleTip,
    LandmarkIndex::RingTip,
    LandmarkIndex::PinkyTip,
];

/// 各指先の比較対象 (親指: IP関節, 他: PIP関節)
const REFERENCE_INDICES: [LandmarkIndex; 5] = [
    LandmarkIndex::ThumbIp,
    LandmarkIndex::IndexPip,
    LandmarkIndex::MiddlePip,
    LandmarkIndex::RingPip,
    LandmarkIndex::PinkyPip,
];

/// フレーム単位のジェスチャーラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Fist,
    OpenPalm,
    IndexPoint,
    Unknown,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fist => "fist",
            Self::OpenPalm => "open-palm",
            Self::IndexPoint => "index-point",
            Self::Unknown => "unknown",
        }
    }
}

/// 5本の指の伸展ベクトル (親指, 人差し指, 中指, 薬指, 小指)
pub type Extension = [bool; 5];

/// 指ごとの伸展判定
///
/// 親指は水平方向 (先端がIP関節より左なら伸展)、
/// 他の指は垂直方向 (先端がPIP関節より上なら伸展) で比較する。
pub fn extension(hand: &HandLandmarks) -> Extension {
    let mut out = [false; 5];
    let thumb_tip = hand.get(TIP_INDICES[0]);
    let thumb_ref = hand.get(REFERENCE_INDICES[0]);
    out[0] = thumb_tip.x < thumb_ref.x;
    for finger in 1..5 {
        let tip = hand.get(TIP_INDICES[finger]);
        let reference = hand.get(REFERENCE_INDICES[finger]);
        out[finger] = tip.y < reference.y;
    }
    out
}

/// 伸展ベクトル → ジェスチャー
pub fn classify_extension(ext: Extension) -> Gesture {
    match ext {
        [false, false, false, false, false] => Gesture::Fist,
        [true, true, true, true, true] => Gesture::OpenPalm,
        [false, true, false, false, false] => Gesture::IndexPoint,
        _ => Gesture::Unknown,
    }
}

/// 1フレームを分類する。手が無ければUnknown
pub fn classify(hand: Option<&HandLandmarks>) -> Gesture {
    match hand {
        Some(hand) => classify_extension(extension(hand)),
        None => Gesture::Unknown,
    }
}
