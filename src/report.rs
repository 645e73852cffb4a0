//! レポート出力と結果JSONの読み書き

use crate::error::Result;
use chrono::Local;
use mediscan_common::{render_text, DetectionResult};
use std::path::Path;

/// 見出し付きのテキストレポート
pub fn render_report(source: &str, result: &DetectionResult) -> String {
    let mut out = format!(
        "MediScan AI Report\nSource:    {}\nGenerated: {}\n\n",
        source,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    out.push_str(&render_text(result));
    out
}

pub fn save_result(path: &Path, result: &DetectionResult) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_result(path: &Path) -> Result<DetectionResult> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_report_header() {
        let result = DetectionResult {
            confidence: 0.9,
            detected_conditions: vec!["Cardiomegaly".to_string()],
            ..Default::default()
        };
        let text = render_report("chest.png", &result);
        assert!(text.starts_with("MediScan AI Report\nSource:    chest.png\n"));
        assert!(text.contains("Confidence Score:    90%"));
    }
}
