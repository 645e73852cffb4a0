//! 画像アップロードコンポーネント

use crate::analysis::BrowserFile;
use leptos::prelude::*;
use mediscan_common::upload::ADVISORY_FORMATS;
use mediscan_common::UploadCollector;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, File, FileList, FileReader, HtmlInputElement};

#[component]
pub fn ImageUploader<F, C>(
    collector: RwSignal<UploadCollector>,
    is_analyzing: ReadSignal<bool>,
    on_select: F,
    on_clear: C,
) -> impl IntoView
where
    F: Fn(BrowserFile) + 'static + Clone + Send + Sync,
    C: Fn() + 'static + Clone + Send + Sync,
{
    let accept = {
        let on_select = on_select.clone();
        move |file: Option<BrowserFile>| {
            if let Some(file) = file {
                read_preview(file.0.clone(), collector);
                on_select(file);
            }
        }
    };

    let on_drop = {
        let accept = accept.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            ev.stop_propagation();
            if is_analyzing.get_untracked() {
                collector.update(|c| c.drag_leave());
                return;
            }
            let files = ev.data_transfer().and_then(|dt| dt.files());
            let accepted = collector
                .try_update(|c| c.drop_files(files.map(file_list).unwrap_or_default()))
                .flatten();
            accept(accepted);
        }
    };

    let on_drag_enter = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        collector.update(|c| c.drag_enter());
    };

    let on_drag_over = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        collector.update(|c| c.drag_over());
    };

    let on_drag_leave = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        collector.update(|c| c.drag_leave());
    };

    let on_change = move |ev: web_sys::Event| {
        ev.prevent_default();
        let input: HtmlInputElement = event_target(&ev);
        let first = input.files().and_then(|files| files.get(0)).map(BrowserFile);
        let accepted = first.and_then(|file| collector.with_untracked(|c| c.offer(file)));
        // 同じファイルを選び直しても change が発火するように
        input.set_value("");
        accept(accepted);
    };

    let on_clear = StoredValue::new(on_clear);
    let preview = move || collector.with(|c| c.preview().map(str::to_string));
    let is_dragging = move || collector.with(|c| c.is_dragging());

    view! {
        <Show
            when=move || preview().is_some()
            fallback=move || {
                let on_drop = on_drop.clone();
                let on_change = on_change.clone();
                view! {
                    <div
                        class=move || if is_dragging() { "upload-area dragover" } else { "upload-area" }
                        on:dragenter=on_drag_enter
                        on:dragleave=on_drag_leave
                        on:dragover=on_drag_over
                        on:drop=on_drop
                    >
                        <input
                            type="file"
                            id="file-upload"
                            class="hidden"
                            accept="image/*"
                            on:change=on_change
                            prop:disabled=move || is_analyzing.get()
                        />
                        <label for="file-upload" class="upload-label">
                            <div class="upload-icon">{move || if is_dragging() { "🩻" } else { "⬆" }}</div>
                            <p class="upload-title">
                                {move || if is_dragging() { "Drop your X-ray here" } else { "Upload Chest X-ray" }}
                            </p>
                            <p class="text-muted">"Drag and drop or click to browse"</p>
                            <p class="text-muted small">{ADVISORY_FORMATS}</p>
                        </label>
                    </div>
                }
            }
        >
            <div class="preview">
                <img src=move || preview().unwrap_or_default() alt="X-ray preview" class="preview-image" />
                <Show when=move || !is_analyzing.get()>
                    <button
                        class="preview-clear"
                        title="Remove image"
                        on:click=move |_| on_clear.with_value(|f| f())
                    >
                        "✕"
                    </button>
                </Show>
            </div>
        </Show>
    }
}

fn file_list(files: FileList) -> Vec<BrowserFile> {
    (0..files.length())
        .filter_map(|i| files.get(i))
        .map(BrowserFile)
        .collect()
}

/// FileReader で data URL を読み、受付のプレビューに設定
fn read_preview(file: File, collector: RwSignal<UploadCollector>) {
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            web_sys::console::error_1(&e);
            return;
        }
    };

    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        if let Some(data_url) = reader_clone.result().ok().and_then(|r| r.as_string()) {
            collector.update(|c| c.set_preview(data_url));
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onloadend(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    if let Err(e) = reader.read_as_data_url(&file) {
        web_sys::console::error_1(&e);
    }
}
