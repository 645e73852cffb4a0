//! 模擬解析の実行（CLI）
//!
//! 待ち時間は tokio のタイマーで、画像デコードはブロッキングスレッドで行う。

use indicatif::{ProgressBar, ProgressStyle};
use mediscan_common::decode::probe_dimensions;
use mediscan_common::{
    analyze_image, AnalysisBackend, AnalysisOptions, Completion, Error, ImageDimensions, ImageFile,
    LocalUrlRegistry, RandomSource, Session,
};
use std::time::Duration;

pub type CliSession = Session<LocalUrlRegistry>;

/// tokio 上のバックエンド
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl AnalysisBackend for NativeBackend {
    type File = ImageFile;

    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }

    async fn probe_dimensions(&self, file: &ImageFile) -> mediscan_common::Result<ImageDimensions> {
        let bytes = file.bytes.clone();
        tokio::task::spawn_blocking(move || probe_dimensions(&bytes))
            .await
            .map_err(|e| Error::AnalysisRejected(e.to_string()))?
    }
}

/// 選択中のファイルを解析してセッションに反映する
///
/// 解析を開始できない状態（ファイル未選択・解析済み）では None。
pub async fn analyze_selected<R: RandomSource>(
    session: &mut CliSession,
    rng: &mut R,
    options: &AnalysisOptions,
    show_progress: bool,
) -> Option<Completion> {
    let file = session.file().cloned()?;
    let ticket = session.begin_analysis()?;

    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Analyzing X-ray...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    } else {
        ProgressBar::hidden()
    };

    let outcome = analyze_image(&NativeBackend, &file, rng, options).await;
    spinner.finish_and_clear();

    Some(session.finish_analysis(ticket, outcome))
}
