//! 解析レポートコンポーネント

use leptos::prelude::*;
use mediscan_common::report::{sections, ReportSection};
use mediscan_common::DetectionResult;

#[component]
pub fn AnalysisReport(result: DetectionResult) -> impl IntoView {
    sections(&result)
        .into_iter()
        .map(|section| view! { <Section section=section /> })
        .collect_view()
}

#[component]
fn Section(section: ReportSection) -> impl IntoView {
    let title = section.title();
    match section {
        ReportSection::Summary { confidence_percent, condition_count } => view! {
            <div class="report-summary">
                <h2>{title}</h2>
                <p class="text-muted">"Powered by deep learning algorithms"</p>
                <div class="summary-grid">
                    <div class="summary-cell">
                        <p class="summary-caption">"Confidence Score"</p>
                        <p class="summary-value">{format!("{}%", confidence_percent)}</p>
                    </div>
                    <div class="summary-cell">
                        <p class="summary-caption">"Conditions Detected"</p>
                        <p class="summary-value">{condition_count}</p>
                    </div>
                </div>
            </div>
        }
        .into_any(),
        ReportSection::Conditions(conditions) => view! {
            <div class="report-card">
                <h3>{title}</h3>
                <ol class="condition-list">
                    {conditions
                        .into_iter()
                        .enumerate()
                        .map(|(i, condition)| view! {
                            <li class="condition-item">
                                <span class="item-number">{i + 1}</span>
                                <span class="condition-name">{condition}</span>
                            </li>
                        })
                        .collect_view()}
                </ol>
            </div>
        }
        .into_any(),
        ReportSection::ClinicalAnalysis(text) => view! {
            <div class="report-card">
                <h3>{title}</h3>
                <p class="analysis-text">{text}</p>
            </div>
        }
        .into_any(),
        ReportSection::Recommendations(items) => view! {
            <div class="report-card">
                <h3>{title}</h3>
                <ul class="recommendation-list">
                    {items
                        .into_iter()
                        .enumerate()
                        .map(|(i, item)| view! {
                            <li class="recommendation-item">
                                <span class="item-number">{i + 1}</span>
                                <p>{item}</p>
                            </li>
                        })
                        .collect_view()}
                </ul>
            </div>
        }
        .into_any(),
        ReportSection::Disclaimer { body, .. } => view! {
            <div class="report-disclaimer">
                <h4>{title}</h4>
                <p>{body}</p>
            </div>
        }
        .into_any(),
    }
}
