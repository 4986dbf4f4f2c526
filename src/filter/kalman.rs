/// 観測ノイズ (大きいほど平滑化が強い)
pub const MEASUREMENT_NOISE: f32 = 1.0;
/// プロセスノイズ。推定値の大きさに比例して誤差項に加算される
pub const PROCESS_NOISE: f32 = 0.01;

/// 1軸の再帰推定器
#[derive(Debug, Clone, Copy)]
struct ScalarKalman {
    estimate: f32,
    error: f32,
    measurement_noise: f32,
    process_noise: f32,
}

impl ScalarKalman {
    fn new(measurement_noise: f32, process_noise: f32) -> Self {
        Self {
            estimate: 0.0,
            error: 1.0,
            measurement_noise,
            process_noise,
        }
    }

    fn update(&mut self, measurement: f32) -> f32 {
        let gain = self.error / (self.error + self.measurement_noise);
        self.estimate += gain * (measurement - self.estimate);
        // 誤差項が推定値の大きさに依存するので、大きく動いた直後は収束が速い
        self.error = (1.0 - gain) * self.error + self.estimate.abs() * self.process_noise;
        self.estimate
    }
}

/// カーソル座標の平滑化フィルタ (x, y 独立)
///
/// 明示的なリセットは無い。ポインターが途切れて再出現した場合は
/// 直前の推定値から再収束する。
#[derive(Debug, Clone)]
pub struct PointerSmoother {
    x: ScalarKalman,
    y: ScalarKalman,
}

impl PointerSmoother {
    pub fn new() -> Self {
        Self::with_noise(MEASUREMENT_NOISE, PROCESS_NOISE)
    }

    pub fn with_noise(measurement_noise: f32, process_noise: f32) -> Self {
        Self {
            x: ScalarKalman::new(measurement_noise, process_noise),
            y: ScalarKalman::new(measurement_noise, process_noise),
        }
    }

    /// 生のピクセル座標を入れて、丸めた推定座標を返す
    pub fn apply(&mut self, x: i32, y: i32) -> (i32, i32) {
        let ex = self.x.update(x as f32);
        let ey = self.y.update(y as f32);
        (ex.round() as i32, ey.round() as i32)
    }

    /// 現在の推定値 (丸め前)
    pub fn estimate(&self) -> (f32, f32) {
        (self.x.estimate, self.y.estimate)
    }
}

impl Default for PointerSmoother {
    fn default() -> Self {
        Self::new()
    }
}
