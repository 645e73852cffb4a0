//! X線画像ビューア
//!
//! 領域は%座標で配置し、ズームは左上原点の scale で画像ごと拡大する。

use leptos::prelude::*;
use mediscan_common::viewer::{area_count_label, area_style, severity_caption, severity_class, severity_tint};
use mediscan_common::{HighlightedArea, ViewerState};

#[component]
pub fn XRayViewer(image_url: String, areas: Vec<HighlightedArea>) -> impl IntoView {
    let viewer = RwSignal::new(ViewerState::default());
    let count = area_count_label(areas.len());

    let stage_style = move || {
        format!(
            "transform: scale({}); transform-origin: top left; transition: transform 0.2s;",
            viewer.with(|v| v.zoom())
        )
    };

    let boxes = areas
        .iter()
        .cloned()
        .map(|area| view! { <AreaBox area=area viewer=viewer /> })
        .collect_view();

    let rows = areas
        .into_iter()
        .map(|area| view! { <AreaRow area=area viewer=viewer /> })
        .collect_view();

    view! {
        <div class="xray-viewer">
            <div class="viewer-toolbar">
                <div class="zoom-controls">
                    <button
                        title="Zoom Out"
                        on:click=move |_| viewer.update(|v| v.zoom_out())
                        prop:disabled=move || !viewer.with(|v| v.can_zoom_out())
                    >
                        "−"
                    </button>
                    <span class="zoom-label">{move || format!("{}%", viewer.with(|v| v.zoom_percent()))}</span>
                    <button
                        title="Zoom In"
                        on:click=move |_| viewer.update(|v| v.zoom_in())
                        prop:disabled=move || !viewer.with(|v| v.can_zoom_in())
                    >
                        "+"
                    </button>
                    <button title="Reset Zoom" on:click=move |_| viewer.update(|v| v.reset_zoom())>
                        "⤢"
                    </button>
                </div>
                <div class="area-count">{count}</div>
            </div>

            <div class="viewer-canvas">
                <div class="viewer-stage" style=stage_style>
                    <img src=image_url alt="X-ray scan" class="viewer-image" />
                    {boxes}
                </div>
            </div>

            <div class="area-list">{rows}</div>
        </div>
    }
}

/// 画像上の枠（クリックでトグル、ホバーで選択）
#[component]
fn AreaBox(area: HighlightedArea, viewer: RwSignal<ViewerState>) -> impl IntoView {
    let tint = severity_tint(Some(area.severity)).to_hex();
    let style = format!("{} border-color: {};", area_style(&area), tint);
    let base_class = format!("area-box {}", severity_class(area.severity));

    let id = area.id.clone();
    let class = move || {
        if viewer.with(|v| v.is_selected(&id)) {
            format!("{} selected", base_class)
        } else {
            base_class.clone()
        }
    };

    let click_id = area.id.clone();
    let hover_id = area.id.clone();

    view! {
        <div
            class=class
            style=style
            on:click=move |_| viewer.update(|v| v.select_area(&click_id))
            on:mouseenter=move |_| viewer.update(|v| v.hover_area(&hover_id))
        >
            <div class="area-tag">{area.label}</div>
        </div>
    }
}

/// 一覧の行（クリックで選択、トグルはしない）
#[component]
fn AreaRow(area: HighlightedArea, viewer: RwSignal<ViewerState>) -> impl IntoView {
    let dot = format!("background-color: {};", severity_tint(Some(area.severity)).to_hex());
    let caption = severity_caption(area.severity);

    let id = area.id.clone();
    let class = move || {
        if viewer.with(|v| v.is_selected(&id)) {
            "area-row selected"
        } else {
            "area-row"
        }
    };

    let pick_id = area.id.clone();

    view! {
        <button class=class on:click=move |_| viewer.update(|v| v.pick_area(&pick_id))>
            <div class="area-row-text">
                <p class="area-row-label">{area.label}</p>
                <p class="area-row-severity">{caption}</p>
            </div>
            <div class="severity-dot" style=dot />
        </button>
    }
}
