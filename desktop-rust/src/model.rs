use mediscan_common::{LocalUrlRegistry, Session, UploadCollector, ViewerState};

pub type DesktopSession = Session<LocalUrlRegistry>;

pub struct AppState {
    pub session: DesktopSession,
    pub collector: UploadCollector,
    pub viewer: ViewerState,
    /// 前フレームでポインタが乗っていた領域
    pub hovered: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: Session::new(LocalUrlRegistry::new()),
            collector: UploadCollector::new().on_reject(|rejection| {
                tracing::debug!("ignored drop: {}", rejection);
            }),
            viewer: ViewerState::default(),
            hovered: None,
        }
    }
}

impl AppState {
    /// セッション・プレビュー・ビューアをまとめて初期化
    pub fn reset(&mut self) {
        self.session.reset();
        self.collector.clear_preview();
        self.viewer = ViewerState::default();
        self.hovered = None;
    }
}
