//! アップロード受付
//!
//! ドラッグ&ドロップ/ファイル選択で渡されたファイルのうち、
//! MIMEタイプが `image/` で始まるものだけを受け付ける。それ以外は黙って捨てる。
//! 拒否を通知したい場合は `on_reject` でフックを登録する。

use crate::types::ImageFile;
use std::fmt;
use std::sync::Arc;

/// 表示のみの案内文（検証はしない）
pub const ADVISORY_FORMATS: &str = "Supports: JPG, PNG, DICOM (max 10MB)";

/// 受付対象として扱えるファイル
pub trait UploadFile {
    fn file_name(&self) -> String;
    fn media_type(&self) -> String;
}

impl UploadFile for ImageFile {
    fn file_name(&self) -> String {
        self.name.clone()
    }

    fn media_type(&self) -> String {
        self.media_type.clone()
    }
}

pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// ドラッグ状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// 拒否されたファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub file_name: String,
    pub media_type: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) is not an image", self.file_name, self.media_type)
    }
}

pub type RejectionHook = Arc<dyn Fn(&Rejection) + Send + Sync>;

/// アップロード受付の状態
#[derive(Clone, Default)]
pub struct UploadCollector {
    drag: DragState,
    preview: Option<String>,
    on_reject: Option<RejectionHook>,
}

impl fmt::Debug for UploadCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadCollector")
            .field("drag", &self.drag)
            .field("has_preview", &self.preview.is_some())
            .field("has_reject_hook", &self.on_reject.is_some())
            .finish()
    }
}

impl UploadCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 拒否時のフックを登録
    pub fn on_reject<H>(mut self, hook: H) -> Self
    where
        H: Fn(&Rejection) + Send + Sync + 'static,
    {
        self.on_reject = Some(Arc::new(hook));
        self
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }

    pub fn drag_enter(&mut self) {
        self.drag = DragState::Dragging;
    }

    pub fn drag_over(&mut self) {
        self.drag = DragState::Dragging;
    }

    pub fn drag_leave(&mut self) {
        self.drag = DragState::Idle;
    }

    /// ドロップ: 先頭のファイルだけを対象にする
    pub fn drop_files<F, I>(&mut self, files: I) -> Option<F>
    where
        F: UploadFile,
        I: IntoIterator<Item = F>,
    {
        self.drag = DragState::Idle;
        files.into_iter().next().and_then(|file| self.offer(file))
    }

    /// ファイル選択: 画像なら呼び出し元へ返す
    pub fn offer<F: UploadFile>(&self, file: F) -> Option<F> {
        let media_type = file.media_type();
        if is_image_media_type(&media_type) {
            return Some(file);
        }

        if let Some(hook) = &self.on_reject {
            hook(&Rejection {
                file_name: file.file_name(),
                media_type,
            });
        }
        None
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// 読み込み完了したプレビュー（data URL）を設定
    pub fn set_preview(&mut self, data_url: String) {
        self.preview = Some(data_url);
    }

    pub fn clear_preview(&mut self) {
        self.preview = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn file(name: &str, media_type: &str) -> ImageFile {
        ImageFile::new(name, media_type, vec![1, 2, 3])
    }

    #[test]
    fn test_is_image_media_type() {
        assert!(is_image_media_type("image/png"));
        assert!(is_image_media_type("image/dicom"));
        assert!(!is_image_media_type("application/pdf"));
        assert!(!is_image_media_type("IMAGE/PNG"));
        assert!(!is_image_media_type(""));
    }

    #[test]
    fn test_offer_accepts_image() {
        let collector = UploadCollector::new();
        let accepted = collector.offer(file("sample.png", "image/png"));
        assert_eq!(accepted.map(|f| f.name), Some("sample.png".to_string()));
    }

    #[test]
    fn test_offer_rejects_silently() {
        let collector = UploadCollector::new();
        assert!(collector.offer(file("document.pdf", "application/pdf")).is_none());
        assert!(collector.preview().is_none());
    }

    #[test]
    fn test_reject_hook_is_called() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let collector = UploadCollector::new().on_reject(move |r| {
            sink.lock().unwrap().push(r.to_string());
        });

        collector.offer(file("document.pdf", "application/pdf"));
        collector.offer(file("chest.jpg", "image/jpeg"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], "document.pdf (application/pdf) is not an image");
    }

    #[test]
    fn test_drag_state_machine() {
        let mut collector = UploadCollector::new();
        assert_eq!(collector.drag_state(), DragState::Idle);
        collector.drag_enter();
        collector.drag_over();
        assert!(collector.is_dragging());
        collector.drag_leave();
        assert_eq!(collector.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_drop_takes_first_file_and_resets_drag() {
        let mut collector = UploadCollector::new();
        collector.drag_enter();
        let accepted = collector.drop_files(vec![
            file("first.png", "image/png"),
            file("second.png", "image/png"),
        ]);
        assert_eq!(accepted.map(|f| f.name), Some("first.png".to_string()));
        assert!(!collector.is_dragging());
    }

    #[test]
    fn test_drop_non_image_first_is_ignored() {
        let mut collector = UploadCollector::new();
        collector.drag_enter();
        let accepted = collector.drop_files(vec![
            file("document.pdf", "application/pdf"),
            file("second.png", "image/png"),
        ]);
        assert!(accepted.is_none());
        assert!(!collector.is_dragging());
    }

    #[test]
    fn test_drop_empty() {
        let mut collector = UploadCollector::new();
        assert!(collector.drop_files(Vec::<ImageFile>::new()).is_none());
    }

    #[test]
    fn test_preview_set_and_clear() {
        let mut collector = UploadCollector::new();
        collector.set_preview("data:image/png;base64,AAAA".to_string());
        assert_eq!(collector.preview(), Some("data:image/png;base64,AAAA"));
        collector.clear_preview();
        assert!(collector.preview().is_none());
    }
}
