//! 模擬解析エンジン（CLI/デスクトップ/WASM共通）
//!
//! 実際の推論は行わない。固定の待ち時間と画像寸法の取得の後、
//! 所見語彙からランダムに1〜2件を選び、強調領域・説明文・推奨事項・信頼度を合成する。
//!
//! 待ち時間と画像デコードはプラットフォームごとに `AnalysisBackend` で実装する。

use crate::error::Result;
use crate::random::RandomSource;
use crate::types::{Condition, DetectionResult, HighlightedArea, ImageDimensions, Severity};
use std::time::Duration;

/// 既定の擬似推論時間
pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

/// 強調領域の左上座標の範囲（%）
pub const POSITION_RANGE: (f64, f64) = (20.0, 60.0);

/// 強調領域の幅・高さの範囲（%）
pub const SIZE_RANGE: (f64, f64) = (15.0, 35.0);

/// 信頼度の範囲
pub const CONFIDENCE_RANGE: (f64, f64) = (0.75, 0.95);

/// 1回の解析で選ぶ所見数の上限
pub const MAX_CONDITIONS: usize = 2;

/// 推奨事項の定型リスト（先頭 RECOMMENDATION_COUNT 件のみ使用）
pub const RECOMMENDATIONS: [&str; 5] = [
    "Correlation with clinical symptoms and patient history is recommended",
    "Consider follow-up imaging studies for monitoring progression",
    "Laboratory tests including CBC and cardiac enzymes may be helpful",
    "Consultation with a cardiologist or pulmonologist is advised",
    "Review previous imaging studies for comparison if available",
];

pub const RECOMMENDATION_COUNT: usize = 3;

/// 解析オプション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub delay: Duration,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self { delay: DEFAULT_DELAY }
    }
}

impl AnalysisOptions {
    pub fn with_delay_ms(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// プラットフォーム依存部分（待機・画像デコード）
#[allow(async_fn_in_trait)]
pub trait AnalysisBackend {
    type File;

    /// 擬似推論時間だけ待つ（他の処理をブロックしないこと）
    async fn wait(&self, delay: Duration);

    /// 画像をデコードしてピクセル寸法を得る。デコード不可なら `Error::Decode`
    async fn probe_dimensions(&self, file: &Self::File) -> Result<ImageDimensions>;
}

/// 解析を1回実行する
///
/// 待機 → 寸法取得 → 結果合成 の順に逐次実行する。開始後のキャンセルは無い。
pub async fn analyze_image<B, R>(
    backend: &B,
    file: &B::File,
    rng: &mut R,
    options: &AnalysisOptions,
) -> Result<DetectionResult>
where
    B: AnalysisBackend,
    R: RandomSource,
{
    tracing::debug!(delay_ms = options.delay.as_millis() as u64, "simulating inference latency");
    backend.wait(options.delay).await;

    let dims = backend.probe_dimensions(file).await?;
    tracing::debug!(width = dims.width, height = dims.height, "image decoded");

    let result = MockAnalyzer::new(rng).generate(dims);
    tracing::debug!(
        conditions = ?result.detected_conditions,
        confidence = result.confidence,
        "mock analysis generated"
    );
    Ok(result)
}

/// 解析結果の合成器
pub struct MockAnalyzer<R> {
    rng: R,
}

impl<R: RandomSource> MockAnalyzer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }

    /// 結果を合成する
    ///
    /// 座標はパーセンテージで直接生成するため、`dims` は参照しない。
    pub fn generate(&mut self, _dims: ImageDimensions) -> DetectionResult {
        let conditions = self.sample_conditions();

        let highlighted_areas = conditions
            .iter()
            .enumerate()
            .map(|(index, condition)| self.synthesize_area(index, *condition))
            .collect();

        let analysis = conditions
            .iter()
            .map(|c| c.explanation())
            .collect::<Vec<_>>()
            .join(" ");

        let recommendations = RECOMMENDATIONS[..RECOMMENDATION_COUNT]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let confidence = self.confidence();

        DetectionResult {
            confidence,
            detected_conditions: conditions.iter().map(|c| c.label().to_string()).collect(),
            highlighted_areas,
            analysis,
            recommendations,
        }
    }

    /// 語彙をシャッフルし、先頭1〜2件を取る
    fn sample_conditions(&mut self) -> Vec<Condition> {
        let mut vocabulary = Condition::ALL;
        self.rng.shuffle(&mut vocabulary);
        let count = self.rng.index(MAX_CONDITIONS) + 1;
        vocabulary[..count].to_vec()
    }

    fn synthesize_area(&mut self, index: usize, condition: Condition) -> HighlightedArea {
        let x = self.rng.range(POSITION_RANGE.0, POSITION_RANGE.1);
        let y = self.rng.range(POSITION_RANGE.0, POSITION_RANGE.1);
        let width = self.rng.range(SIZE_RANGE.0, SIZE_RANGE.1);
        let height = self.rng.range(SIZE_RANGE.0, SIZE_RANGE.1);
        let severity = Severity::ALL[self.rng.index(Severity::ALL.len())];

        HighlightedArea {
            id: format!("area-{}", index),
            x,
            y,
            width,
            height,
            label: condition.label().to_string(),
            severity,
        }
    }

    fn confidence(&mut self) -> f64 {
        let raw = self.rng.range(CONFIDENCE_RANGE.0, CONFIDENCE_RANGE.1);
        (raw * 100.0).round() / 100.0
    }
}

#[cfg(all(test, feature = "native"))]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::random::{RngSource, SequenceRandom};
    use futures::executor::block_on;
    use std::cell::Cell;
    use std::collections::HashSet;

    struct FakeBackend {
        waited: Cell<Option<Duration>>,
        dims: Option<ImageDimensions>,
    }

    impl FakeBackend {
        fn decodable() -> Self {
            Self {
                waited: Cell::new(None),
                dims: Some(ImageDimensions { width: 1024, height: 768 }),
            }
        }

        fn broken() -> Self {
            Self {
                waited: Cell::new(None),
                dims: None,
            }
        }
    }

    impl AnalysisBackend for FakeBackend {
        type File = &'static str;

        async fn wait(&self, delay: Duration) {
            self.waited.set(Some(delay));
        }

        async fn probe_dimensions(&self, file: &Self::File) -> Result<ImageDimensions> {
            self.dims
                .ok_or_else(|| Error::Decode(format!("cannot decode {}", file)))
        }
    }

    fn assert_invariants(result: &DetectionResult) {
        assert!((0.75..=0.95).contains(&result.confidence), "confidence {}", result.confidence);
        assert_eq!((result.confidence * 100.0).round() / 100.0, result.confidence);

        let n = result.detected_conditions.len();
        assert!(n == 1 || n == 2);
        let unique: HashSet<_> = result.detected_conditions.iter().collect();
        assert_eq!(unique.len(), n);
        for c in &result.detected_conditions {
            assert!(Condition::from_label(c).is_some(), "unknown condition {}", c);
        }

        assert_eq!(result.highlighted_areas.len(), n);
        let ids: HashSet<_> = result.highlighted_areas.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), n);
        for area in &result.highlighted_areas {
            assert!(result.detected_conditions.contains(&area.label));
            assert!((20.0..60.0).contains(&area.x));
            assert!((20.0..60.0).contains(&area.y));
            assert!((15.0..35.0).contains(&area.width));
            assert!((15.0..35.0).contains(&area.height));
        }

        assert_eq!(result.recommendations, RECOMMENDATIONS[..3].to_vec());
    }

    #[test]
    fn test_generate_invariants_many_seeds() {
        for seed in 0..200 {
            let mut analyzer = MockAnalyzer::new(RngSource::seeded(seed));
            let result = analyzer.generate(ImageDimensions { width: 512, height: 512 });
            assert_invariants(&result);
        }
    }

    #[test]
    fn test_generate_is_deterministic_for_sequence() {
        // シャッフル3回 / 件数 / 領域1つ分(5) / 信頼度
        let draws = vec![0.99, 0.99, 0.99, 0.0, 0.5, 0.25, 0.0, 0.5, 0.7, 0.5];
        let mut analyzer = MockAnalyzer::new(SequenceRandom::new(draws));
        let result = analyzer.generate(ImageDimensions::default());

        assert_eq!(result.detected_conditions, vec!["Cardiomegaly".to_string()]);
        let area = &result.highlighted_areas[0];
        assert_eq!(area.id, "area-0");
        assert_eq!(area.x, 40.0);
        assert_eq!(area.y, 30.0);
        assert_eq!(area.width, 15.0);
        assert_eq!(area.height, 25.0);
        assert_eq!(area.severity, Severity::High);
        assert_eq!(result.confidence, 0.85);
        assert_eq!(result.analysis, Condition::Cardiomegaly.explanation());
        assert_eq!(analyzer.into_inner().draws(), 10);
    }

    #[test]
    fn test_two_conditions_analysis_in_selection_order() {
        let draws = vec![0.99, 0.99, 0.99, 0.6];
        let mut analyzer = MockAnalyzer::new(SequenceRandom::new(draws));
        let result = analyzer.generate(ImageDimensions::default());

        assert_eq!(result.detected_conditions.len(), 2);
        let expected = format!(
            "{} {}",
            Condition::from_label(&result.detected_conditions[0]).unwrap().explanation(),
            Condition::from_label(&result.detected_conditions[1]).unwrap().explanation()
        );
        assert_eq!(result.analysis, expected);
        assert_eq!(result.highlighted_areas[1].id, "area-1");
    }

    #[test]
    fn test_confidence_upper_bound_rounds_to_095() {
        let mut analyzer = MockAnalyzer::new(SequenceRandom::new(vec![1.0]));
        assert_eq!(analyzer.confidence(), 0.95);
    }

    #[test]
    fn test_analyze_image_waits_then_generates() {
        let backend = FakeBackend::decodable();
        let mut rng = RngSource::seeded(7);
        let options = AnalysisOptions::with_delay_ms(1500);

        let result = block_on(analyze_image(&backend, &"sample.png", &mut rng, &options))
            .expect("解析失敗");

        assert_eq!(backend.waited.get(), Some(Duration::from_millis(1500)));
        assert_invariants(&result);
    }

    #[test]
    fn test_analyze_image_decode_error() {
        let backend = FakeBackend::broken();
        let mut rng = SequenceRandom::new(vec![0.5]);

        let err = block_on(analyze_image(&backend, &"broken.png", &mut rng, &AnalysisOptions::default()))
            .unwrap_err();

        assert!(matches!(err, Error::Decode(_)));
        // デコード失敗時は乱数を消費しない
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(AnalysisOptions::default().delay, Duration::from_secs(2));
    }
}
