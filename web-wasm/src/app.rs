//! メインアプリケーションコンポーネント
//!
//! セッション（ファイル・オブジェクトURL・結果）は `StoredValue` に置き、
//! 画面に必要な値だけをシグナルへ写す。

use crate::analysis::{BrowserBackend, BrowserFile, BrowserUrls, MathRandom};
use crate::components::{
    analysis_report::AnalysisReport, header::Header, image_uploader::ImageUploader,
    xray_viewer::XRayViewer,
};
use leptos::ev;
use leptos::prelude::*;
use mediscan_common::{
    analyze_image, AnalysisOptions, Completion, DetectionResult, Session, UploadCollector,
};
use wasm_bindgen_futures::spawn_local;

pub type WebSession = Session<BrowserUrls>;

/// 画面表示用のセッションの写し
#[derive(Clone, Default, PartialEq)]
struct Snapshot {
    image_url: Option<String>,
    result: Option<DetectionResult>,
    is_analyzing: bool,
}

impl Snapshot {
    fn of(session: &WebSession) -> Self {
        Self {
            image_url: session.image_url().map(str::to_string),
            result: session.result().cloned(),
            is_analyzing: session.is_analyzing(),
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let session = StoredValue::new_local(Session::new(BrowserUrls));
    let collector = RwSignal::new(UploadCollector::new().on_reject(|rejection| {
        web_sys::console::debug_1(&format!("ignored: {}", rejection).into());
    }));

    let (image_url, set_image_url) = signal(None::<String>);
    let (result, set_result) = signal(None::<DetectionResult>);
    let (is_analyzing, set_is_analyzing) = signal(false);

    let publish = move || {
        let Some(snapshot) = session.try_with_value(Snapshot::of) else {
            return;
        };
        set_image_url.set(snapshot.image_url);
        set_result.set(snapshot.result);
        set_is_analyzing.set(snapshot.is_analyzing);
    };

    // ファイル選択ハンドラ
    let on_select = move |file: BrowserFile| {
        match session.try_update_value(|s| s.select_file(file)) {
            Some(Err(e)) => web_sys::console::error_1(&format!("Failed to open image: {}", e).into()),
            _ => publish(),
        }
    };

    // リセット（プレビュー消去も同じ扱い）
    let on_reset = move || {
        session.update_value(|s| s.reset());
        collector.update(|c| c.clear_preview());
        publish();
    };

    // 解析開始ハンドラ
    let on_analyze = move |_: ev::MouseEvent| {
        let started = session
            .try_update_value(|s| {
                let file = s.file().cloned()?;
                let ticket = s.begin_analysis()?;
                Some((file, ticket))
            })
            .flatten();
        let Some((file, ticket)) = started else {
            return;
        };
        publish();

        spawn_local(async move {
            let outcome =
                analyze_image(&BrowserBackend, &file, &mut MathRandom, &AnalysisOptions::default()).await;
            let completion = session.try_update_value(|s| s.finish_analysis(ticket, outcome));
            if let Some(Completion::Failed(message)) = completion {
                web_sys::console::error_1(&format!("Analysis failed: {}", message).into());
            }
            publish();
        });
    };

    view! {
        <div class="container">
            <Header />

            <section class="card">
                <h2>"Upload X-ray Image"</h2>
                <p class="text-muted">"Upload a chest X-ray image to begin AI-powered analysis"</p>

                <ImageUploader
                    collector=collector
                    is_analyzing=is_analyzing
                    on_select=on_select
                    on_clear=on_reset
                />

                <Show when=move || image_url.with(Option::is_some) && result.with(Option::is_none)>
                    <button
                        class="analyze-button"
                        on:click=on_analyze
                        prop:disabled=move || is_analyzing.get()
                    >
                        {move || if is_analyzing.get() { "Analyzing X-ray..." } else { "Analyze X-ray" }}
                    </button>
                </Show>
            </section>

            {move || {
                let url = image_url.get()?;
                let result = result.get()?;
                Some(view! {
                    <section class="card">
                        <h2>"Detected Anomalies"</h2>
                        <p class="text-muted">"Interactive visualization of detected conditions"</p>
                        <XRayViewer image_url=url areas=result.highlighted_areas.clone() />
                    </section>

                    <section class="report">
                        <AnalysisReport result=result />
                    </section>

                    <div class="text-center">
                        <button class="reset-button" on:click=move |_| on_reset()>
                            "Analyze Another X-ray"
                        </button>
                    </div>
                })
            }}
        </div>
    }
}
