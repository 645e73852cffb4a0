//! 画像ファイルの受付（CLI）

use crate::error::{MediScanError, Result};
use base64::Engine;
use mediscan_common::decode::read_image_file;
use mediscan_common::{ImageFile, UploadCollector};
use std::path::Path;

/// 拒否をログに出す受付
pub fn cli_collector() -> UploadCollector {
    UploadCollector::new().on_reject(|rejection| {
        tracing::warn!("画像ではないためスキップ: {}", rejection);
    })
}

/// プレビュー用の data URL
pub fn data_url(media_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        media_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// パスの画像を受け付ける
///
/// 画像でなければ `Ok(None)`（受付の状態は変えない）。受け付けた場合はプレビューを設定する。
pub fn collect(path: &Path, collector: &mut UploadCollector) -> Result<Option<ImageFile>> {
    if !path.is_file() {
        return Err(MediScanError::FileNotFound(path.display().to_string()));
    }

    let file = read_image_file(path)?;
    let Some(file) = collector.offer(file) else {
        return Ok(None);
    };

    collector.set_preview(data_url(&file.media_type, &file.bytes));
    Ok(Some(file))
}
