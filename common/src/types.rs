//! 解析結果の型定義
//!
//! CLI・デスクトップ・Web(WASM)で共有される型:
//! - DetectionResult: 1回の解析で生成される結果（生成後は不変）
//! - HighlightedArea: 画像に重ねる強調領域（座標は画像サイズに対する%）
//! - ImageFile: ネイティブ側で扱うアップロード画像

use serde::{Deserialize, Serialize};
use std::fmt;

/// 検出対象の所見（固定語彙）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Cardiomegaly,
    PleuralEffusion,
    Pneumonia,
    Atelectasis,
}

impl Condition {
    /// 語彙の既定順
    pub const ALL: [Condition; 4] = [
        Condition::Cardiomegaly,
        Condition::PleuralEffusion,
        Condition::Pneumonia,
        Condition::Atelectasis,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Condition::Cardiomegaly => "Cardiomegaly",
            Condition::PleuralEffusion => "Pleural Effusion",
            Condition::Pneumonia => "Pneumonia",
            Condition::Atelectasis => "Atelectasis",
        }
    }

    /// 所見ごとの定型説明文
    pub fn explanation(&self) -> &'static str {
        match self {
            Condition::Cardiomegaly => {
                "The cardiac silhouette appears enlarged, measuring greater than 50% of the thoracic width. \
                 This suggests possible heart enlargement which may indicate underlying cardiac conditions \
                 such as heart failure, valvular disease, or hypertension."
            }
            Condition::PleuralEffusion => {
                "Fluid accumulation is visible in the pleural space, appearing as a homogeneous opacity \
                 with a meniscus sign. This could indicate congestive heart failure, infection, malignancy, \
                 or other systemic conditions."
            }
            Condition::Pneumonia => {
                "Consolidation patterns are present in the lung parenchyma, showing increased density \
                 consistent with inflammatory infiltrates. The distribution suggests bacterial or viral \
                 pneumonia requiring clinical correlation."
            }
            Condition::Atelectasis => {
                "Partial lung collapse is observed with volume loss and increased opacity. This may be due \
                 to airway obstruction, compression, or post-surgical changes. The affected area shows \
                 displacement of adjacent structures."
            }
        }
    }

    pub fn from_label(label: &str) -> Option<Condition> {
        Condition::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 重症度（色分けにのみ使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// 文字列から変換（未知の値はNone）
    pub fn parse(value: &str) -> Option<Severity> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 強調領域
///
/// x, y, width, height は画像の寸法に対するパーセンテージ。
/// ズーム倍率に依存しないため、ズーム変更時の再計算は不要。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightedArea {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub severity: Severity,
}

/// 解析結果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub confidence: f64,
    pub detected_conditions: Vec<String>,
    pub highlighted_areas: Vec<HighlightedArea>,
    pub analysis: String,
    pub recommendations: Vec<String>,
}

impl DetectionResult {
    pub fn area(&self, id: &str) -> Option<&HighlightedArea> {
        self.highlighted_areas.iter().find(|a| a.id == id)
    }
}

/// 画像のピクセル寸法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// ネイティブ側のアップロード画像（ファイル名・MIMEタイプ・バイト列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_labels_unique() {
        let labels: std::collections::HashSet<_> = Condition::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn test_condition_from_label() {
        assert_eq!(Condition::from_label("Pleural Effusion"), Some(Condition::PleuralEffusion));
        assert_eq!(Condition::from_label("Fracture"), None);
    }

    #[test]
    fn test_explanations_are_distinct() {
        assert!(Condition::Cardiomegaly.explanation().starts_with("The cardiac silhouette"));
        assert!(Condition::Atelectasis.explanation().contains("Partial lung collapse"));
        assert!(!Condition::Pneumonia.explanation().contains("  "));
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("HIGH"), Some(Severity::High));
        assert_eq!(Severity::parse(" low "), Some(Severity::Low));
        assert_eq!(Severity::parse("critical"), None);
    }

    #[test]
    fn test_detection_result_serialize() {
        let result = DetectionResult {
            confidence: 0.82,
            detected_conditions: vec!["Pneumonia".to_string()],
            highlighted_areas: vec![HighlightedArea {
                id: "area-0".to_string(),
                x: 25.0,
                y: 30.0,
                width: 20.0,
                height: 18.0,
                label: "Pneumonia".to_string(),
                severity: Severity::Medium,
            }],
            analysis: "text".to_string(),
            recommendations: vec!["one".to_string()],
        };

        let json = serde_json::to_string(&result).expect("シリアライズ失敗");
        assert!(json.contains("\"detectedConditions\":[\"Pneumonia\"]"));
        assert!(json.contains("\"highlightedAreas\""));
        assert!(json.contains("\"severity\":\"medium\""));
    }

    #[test]
    fn test_detection_result_deserialize() {
        let json = r#"{
            "confidence": 0.91,
            "detectedConditions": ["Atelectasis", "Cardiomegaly"],
            "highlightedAreas": [
                {"id": "area-0", "x": 40.5, "y": 22.0, "width": 30.0, "height": 16.0, "label": "Atelectasis", "severity": "high"}
            ],
            "analysis": "",
            "recommendations": []
        }"#;

        let result: DetectionResult = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(result.detected_conditions.len(), 2);
        assert_eq!(result.area("area-0").map(|a| a.severity), Some(Severity::High));
        assert!(result.area("area-1").is_none());
    }

    #[test]
    fn test_unknown_severity_is_rejected() {
        let json = r#"{"id": "a", "x": 1, "y": 1, "width": 1, "height": 1, "label": "x", "severity": "extreme"}"#;
        assert!(serde_json::from_str::<HighlightedArea>(json).is_err());
    }
}
