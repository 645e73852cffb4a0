//! 乱数ソース
//!
//! 解析結果の生成はすべて `RandomSource` 経由で乱数を引く。
//! 実行時は `RngSource`（rand、native のみ）やブラウザの `Math.random`、テストでは `SequenceRandom` で固定値を注入する。

#[cfg(feature = "native")]
use rand::rngs::StdRng;
#[cfg(feature = "native")]
use rand::{Rng, SeedableRng};

/// [0, 1) の一様乱数を返すソース
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// [0, len) のインデックス
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let i = (self.next_unit() * len as f64).floor() as usize;
        i.min(len - 1)
    }

    /// [low, high) の一様値
    fn range(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_unit() * (high - low)
    }

    /// Fisher-Yates シャッフル
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// rand の乱数生成器を包むソース
#[cfg(feature = "native")]
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

#[cfg(feature = "native")]
impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

#[cfg(feature = "native")]
impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// 与えた値を順に返す（末尾に達したら先頭に戻る）
#[derive(Debug, Clone, Default)]
pub struct SequenceRandom {
    values: Vec<f64>,
    pos: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }

    /// これまでに引かれた回数
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.pos % self.values.len()];
        self.pos += 1;
        // 1.0 ちょうどは範囲外なので直前の値に丸める
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
