//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"MediScan AI"</h1>
            <p class="text-muted">
                "Advanced AI-powered chest X-ray analysis with real-time disease detection and clinical insights"
            </p>
        </header>
    }
}
