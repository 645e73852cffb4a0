//! レポート生成
//!
//! DetectionResult を表示用のセクションに整形する。
//! Web/デスクトップはセクションを、CLIはプレーンテキストを使う。

use crate::types::DetectionResult;

pub const DISCLAIMER_TITLE: &str = "Medical Disclaimer";

pub const DISCLAIMER: &str = "This AI-generated analysis is for educational and research purposes only. \
It should not be used as a substitute for professional medical advice, diagnosis, or treatment. \
Always seek the advice of qualified healthcare providers with any questions regarding medical conditions. \
Never disregard professional medical advice or delay seeking it because of information provided by this tool.";

/// レポートのセクション
#[derive(Debug, Clone, PartialEq)]
pub enum ReportSection {
    Summary {
        confidence_percent: u32,
        condition_count: usize,
    },
    Conditions(Vec<String>),
    ClinicalAnalysis(String),
    Recommendations(Vec<String>),
    Disclaimer {
        title: &'static str,
        body: &'static str,
    },
}

impl ReportSection {
    pub fn title(&self) -> &'static str {
        match self {
            ReportSection::Summary { .. } => "AI Analysis Complete",
            ReportSection::Conditions(_) => "Detected Conditions",
            ReportSection::ClinicalAnalysis(_) => "Clinical Analysis",
            ReportSection::Recommendations(_) => "Recommendations",
            ReportSection::Disclaimer { title, .. } => *title,
        }
    }
}

/// 信頼度を整数%に
pub fn confidence_percent(confidence: f64) -> u32 {
    (confidence * 100.0).round().clamp(0.0, 100.0) as u32
}

/// 結果をセクション列に変換
pub fn sections(result: &DetectionResult) -> Vec<ReportSection> {
    vec![
        ReportSection::Summary {
            confidence_percent: confidence_percent(result.confidence),
            condition_count: result.detected_conditions.len(),
        },
        ReportSection::Conditions(result.detected_conditions.clone()),
        ReportSection::ClinicalAnalysis(result.analysis.clone()),
        ReportSection::Recommendations(result.recommendations.clone()),
        ReportSection::Disclaimer {
            title: DISCLAIMER_TITLE,
            body: DISCLAIMER,
        },
    ]
}

/// プレーンテキストのレポート
pub fn render_text(result: &DetectionResult) -> String {
    let mut out = String::new();

    for section in sections(result) {
        out.push_str(&format!("== {} ==\n", section.title()));
        match &section {
            ReportSection::Summary { confidence_percent, condition_count } => {
                out.push_str(&format!("Confidence Score:    {}%\n", confidence_percent));
                out.push_str(&format!("Conditions Detected: {}\n", condition_count));
            }
            ReportSection::Conditions(items) | ReportSection::Recommendations(items) => {
                for (i, item) in items.iter().enumerate() {
                    out.push_str(&format!("{:>2}. {}\n", i + 1, item));
                }
            }
            ReportSection::ClinicalAnalysis(text) => {
                out.push_str(&wrap(text, 78));
            }
            ReportSection::Disclaimer { body, .. } => {
                out.push_str(&wrap(body, 78));
            }
        }
        out.push('\n');
    }

    out
}

/// 単語単位で折り返す
fn wrap(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        if line_len > 0 && line_len + 1 + word.chars().count() > width {
            out.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(word);
        line_len += word.chars().count();
    }

    if !out.is_empty() {
        out.push('\n');
    }
    out
}
