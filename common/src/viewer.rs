//! 画像オーバーレイビューアの状態と描画計算
//!
//! ズーム倍率と選択中の領域だけを状態として持つ。
//! 領域の座標はズーム前のコンテナに対する%で配置し、コンテナ全体を左上原点で拡大する。

use crate::types::{HighlightedArea, Severity};

pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.25;
pub const ZOOM_DEFAULT: f64 = 1.0;

/// ビューア状態
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    zoom: f64,
    selected: Option<String>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            zoom: ZOOM_DEFAULT,
            selected: None,
        }
    }
}

impl ViewerState {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// 表示用のズーム率（%）
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(ZOOM_MIN);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = ZOOM_DEFAULT;
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom < ZOOM_MAX
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom > ZOOM_MIN
    }

    /// 画像上の領域クリック: 選択中なら解除、別の領域なら置き換え
    pub fn select_area(&mut self, id: &str) {
        if self.is_selected(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.to_string());
        }
    }

    /// ホバー: クリック選択と同じ状態を上書きする
    pub fn hover_area(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }

    /// 一覧の行クリック: 常に選択（トグルしない）
    pub fn pick_area(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

/// "N area(s) detected"
pub fn area_count_label(count: usize) -> String {
    format!("{} area{} detected", count, if count == 1 { "" } else { "s" })
}

/// RGB色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(239, 68, 68);
    pub const YELLOW: Rgb = Rgb(234, 179, 8);
    pub const GREEN: Rgb = Rgb(34, 197, 94);
    pub const BLUE: Rgb = Rgb(59, 130, 246);

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// 枠線の色（未知の重症度は青）
pub fn severity_tint(severity: Option<Severity>) -> Rgb {
    match severity {
        Some(Severity::High) => Rgb::RED,
        Some(Severity::Medium) => Rgb::YELLOW,
        Some(Severity::Low) => Rgb::GREEN,
        None => Rgb::BLUE,
    }
}

/// CSSクラス名
pub fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "severity-high",
        Severity::Medium => "severity-medium",
        Severity::Low => "severity-low",
    }
}

/// 一覧の表示テキスト（例: "High severity"）
pub fn severity_caption(severity: Severity) -> String {
    let s = severity.as_str();
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => format!("{}{} severity", first.to_ascii_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// ピクセル座標の矩形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// 領域の%座標をズーム前のコンテナサイズに写像
    pub fn from_area(area: &HighlightedArea, container_width: f64, container_height: f64) -> Self {
        Self {
            left: area.x / 100.0 * container_width,
            top: area.y / 100.0 * container_height,
            width: area.width / 100.0 * container_width,
            height: area.height / 100.0 * container_height,
        }
    }

    /// 左上原点でズーム
    pub fn scaled(&self, zoom: f64) -> Self {
        Self {
            left: self.left * zoom,
            top: self.top * zoom,
            width: self.width * zoom,
            height: self.height * zoom,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// CSSの配置スタイル（%指定）
pub fn area_style(area: &HighlightedArea) -> String {
    format!(
        "left: {}%; top: {}%; width: {}%; height: {}%;",
        area.x, area.y, area.width, area.height
    )
}

/// 表示座標 (x, y) にある領域のうち最前面（後に描いたもの）のid
pub fn hit_test<'a>(
    areas: &'a [HighlightedArea],
    container_width: f64,
    container_height: f64,
    zoom: f64,
    x: f64,
    y: f64,
) -> Option<&'a str> {
    areas
        .iter()
        .rev()
        .find(|area| {
            PixelRect::from_area(area, container_width, container_height)
                .scaled(zoom)
                .contains(x, y)
        })
        .map(|area| area.id.as_str())
}
