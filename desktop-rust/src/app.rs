use std::path::Path;
use std::sync::mpsc::Receiver;

use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};
use mediscan_common::report::{sections, ReportSection};
use mediscan_common::upload::ADVISORY_FORMATS;
use mediscan_common::viewer::{area_count_label, hit_test, severity_caption, severity_tint, PixelRect, Rgb};
use mediscan_common::{AnalysisOptions, Completion, HighlightedArea, Phase};

use crate::backend::{spawn_analysis, AnalysisDone};
use crate::io::{decode_rgba, default_result_name, load_image_file, save_result, PickedPath};
use crate::model::AppState;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

pub struct DesktopApp {
    state: AppState,
    options: AnalysisOptions,
    status: String,
    analyze_rx: Option<Receiver<AnalysisDone>>,
    /// オブジェクトURLをキーにしたテクスチャ
    texture: Option<(String, egui::TextureHandle)>,
}

impl Default for DesktopApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
            options: AnalysisOptions::default(),
            status: String::new(),
            analyze_rx: None,
            texture: None,
        }
    }
}

impl DesktopApp {
    fn open_image(&mut self) {
        if self.state.session.is_analyzing() {
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .add_filter("All files", &["*"])
            .pick_file()
        else {
            return;
        };
        let picked = self.state.collector.offer(PickedPath(path));
        self.accept(picked);
    }

    fn handle_drops(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));

        if !dropped.is_empty() {
            if self.state.session.is_analyzing() {
                self.state.collector.drag_leave();
                return;
            }
            let paths = dropped.into_iter().filter_map(|f| f.path).map(PickedPath);
            let picked = self.state.collector.drop_files(paths);
            self.accept(picked);
        } else if hovering {
            self.state.collector.drag_over();
        } else if self.state.collector.is_dragging() {
            self.state.collector.drag_leave();
        }
    }

    fn accept(&mut self, picked: Option<PickedPath>) {
        let Some(PickedPath(path)) = picked else {
            return;
        };
        match self.select_path(&path) {
            Ok(true) => self.status = format!("Selected {}", path.display()),
            Ok(false) => {}
            Err(err) => self.status = format!("Open failed: {err}"),
        }
    }

    fn select_path(&mut self, path: &Path) -> anyhow::Result<bool> {
        let file = load_image_file(path)?;
        let selected = self.state.session.select_file(file)?;
        if selected {
            self.state.collector.set_preview(path.display().to_string());
            self.state.viewer = Default::default();
            self.state.hovered = None;
        }
        Ok(selected)
    }

    fn analyze(&mut self) {
        let Some(file) = self.state.session.file().cloned() else {
            return;
        };
        let Some(ticket) = self.state.session.begin_analysis() else {
            return;
        };
        self.status = "Analyzing X-ray...".to_string();
        self.analyze_rx = Some(spawn_analysis(ticket, file, self.options));
    }

    fn reset(&mut self) {
        self.state.reset();
        self.analyze_rx = None;
        self.texture = None;
        self.status.clear();
    }

    fn save_result_as(&mut self) {
        let Some(result) = self.state.session.result() else {
            return;
        };
        let name = self
            .state
            .session
            .file()
            .map(|f| default_result_name(&f.name))
            .unwrap_or_else(|| "result.json".to_string());
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(name.as_str())
            .save_file()
        {
            match save_result(&path, result) {
                Ok(_) => self.status = format!("Saved {}", path.display()),
                Err(err) => self.status = format!("Save failed: {err}"),
            }
        }
    }

    fn poll_messages(&mut self) {
        let Some(rx) = &self.analyze_rx else {
            return;
        };
        let Ok(done) = rx.try_recv() else {
            return;
        };
        self.analyze_rx = None;

        match self.state.session.finish_analysis(done.ticket, done.outcome) {
            Completion::Stored => {
                self.status = "Analysis complete".to_string();
                self.state.viewer = Default::default();
            }
            Completion::Failed(message) => self.status = format!("Analysis failed: {message}"),
            Completion::Discarded => {}
        }
    }

    /// 選択中のファイルのテクスチャを用意
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let Some(url) = self.state.session.image_url() else {
            self.texture = None;
            return;
        };
        if self.texture.as_ref().is_some_and(|(key, _)| key == url) {
            return;
        }
        let url = url.to_string();
        let Some(file) = self.state.session.file() else {
            return;
        };
        match decode_rgba(&file.bytes) {
            Ok(image) => {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(image.size, &image.pixels);
                let texture = ctx.load_texture(&url, color_image, egui::TextureOptions::default());
                self.texture = Some((url, texture));
            }
            Err(err) => {
                tracing::debug!("preview unavailable: {err:#}");
                self.texture = None;
            }
        }
    }

    fn render_upload(&mut self, ui: &mut egui::Ui) {
        let dragging = self.state.collector.is_dragging();
        let frame = egui::Frame::none()
            .fill(if dragging { Color32::from_rgb(30, 41, 59) } else { Color32::from_rgb(24, 28, 40) })
            .stroke(egui::Stroke::new(
                2.0,
                if dragging { rgb(Rgb::BLUE) } else { Color32::from_gray(70) },
            ))
            .rounding(egui::Rounding::same(12.0))
            .inner_margin(egui::Margin::same(32.0));

        frame.show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui| {
                let title = if dragging { "Drop your X-ray here" } else { "Upload Chest X-ray" };
                ui.label(RichText::new(title).size(20.0).strong());
                ui.label("Drag and drop or click to browse");
                ui.add_space(8.0);
                if ui.button("Open X-ray...").clicked() {
                    self.open_image();
                }
                ui.add_space(4.0);
                ui.label(RichText::new(ADVISORY_FORMATS).size(11.0).color(Color32::from_gray(140)));
            });
        });
    }

    fn render_selected(&mut self, ui: &mut egui::Ui) {
        let analyzing = self.state.session.is_analyzing();

        ui.horizontal(|ui| {
            let name = self.state.collector.preview().unwrap_or_default().to_string();
            ui.label(RichText::new(name).color(Color32::from_gray(200)));
            if !analyzing && ui.button("✕ Remove").clicked() {
                self.reset();
            }
        });

        if let Some((_, texture)) = &self.texture {
            let size = texture.size_vec2();
            let max = egui::vec2(ui.available_width(), 384.0);
            let scale = (max.x / size.x).min(max.y / size.y).min(1.0);
            ui.add(egui::Image::new(texture).fit_to_exact_size(size * scale));
        } else {
            ui.label("Preview unavailable");
        }

        ui.add_space(12.0);
        let label = if analyzing { "Analyzing X-ray..." } else { "Analyze X-ray" };
        let button = egui::Button::new(RichText::new(label).size(16.0)).min_size(egui::vec2(ui.available_width(), 40.0));
        if ui.add_enabled(self.state.session.can_analyze(), button).clicked() {
            self.analyze();
        }
        if analyzing {
            ui.add(egui::Spinner::new());
        }
    }

    fn render_viewer(&mut self, ui: &mut egui::Ui, areas: &[HighlightedArea]) {
        let viewer = &mut self.state.viewer;

        ui.horizontal(|ui| {
            if ui.add_enabled(viewer.can_zoom_out(), egui::Button::new("−")).on_hover_text("Zoom Out").clicked() {
                viewer.zoom_out();
            }
            ui.label(format!("{}%", viewer.zoom_percent()));
            if ui.add_enabled(viewer.can_zoom_in(), egui::Button::new("+")).on_hover_text("Zoom In").clicked() {
                viewer.zoom_in();
            }
            if ui.button("⤢").on_hover_text("Reset Zoom").clicked() {
                viewer.reset_zoom();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(area_count_label(areas.len()));
            });
        });

        let Some((_, texture)) = &self.texture else {
            ui.label("Preview unavailable");
            return;
        };

        egui::ScrollArea::both().max_height(600.0).show(ui, |ui| {
            let tex = texture.size_vec2();
            let base_w = ui.available_width().min(tex.x).max(1.0);
            let base_h = base_w * tex.y / tex.x;
            let zoom = viewer.zoom() as f32;

            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(base_w * zoom, base_h * zoom), egui::Sense::click());
            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 0.0, Color32::BLACK);
            painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );

            for area in areas {
                let r = PixelRect::from_area(area, base_w as f64, base_h as f64).scaled(zoom as f64);
                let boxed = egui::Rect::from_min_size(
                    rect.min + egui::vec2(r.left as f32, r.top as f32),
                    egui::vec2(r.width as f32, r.height as f32),
                );
                let tint = rgb(severity_tint(Some(area.severity)));
                painter.rect(boxed, 6.0, tint.gamma_multiply(0.2), egui::Stroke::new(3.0, tint));
                if viewer.is_selected(&area.id) {
                    painter.rect_stroke(boxed.expand(3.0), 8.0, egui::Stroke::new(3.0, Color32::WHITE));
                }

                let galley = painter.layout_no_wrap(
                    area.label.clone(),
                    egui::FontId::proportional(12.0),
                    Color32::WHITE,
                );
                let tag = egui::Rect::from_min_size(
                    boxed.left_top() - egui::vec2(0.0, galley.size().y + 10.0),
                    galley.size() + egui::vec2(12.0, 6.0),
                );
                painter.rect_filled(tag, 4.0, Color32::from_gray(20));
                painter.galley(tag.min + egui::vec2(6.0, 3.0), galley, Color32::WHITE);
            }

            let under_pointer = |pos: egui::Pos2| {
                let local = pos - rect.min;
                hit_test(areas, base_w as f64, base_h as f64, zoom as f64, local.x as f64, local.y as f64)
                    .map(str::to_string)
            };

            // ホバーは領域に入った瞬間だけ選択を上書きする
            let hovered = response.hover_pos().and_then(under_pointer);
            if hovered != self.state.hovered {
                if let Some(id) = &hovered {
                    viewer.hover_area(id);
                }
                self.state.hovered = hovered;
            }

            if response.clicked() {
                if let Some(id) = response.interact_pointer_pos().and_then(under_pointer) {
                    viewer.select_area(&id);
                }
            }
        });

        ui.add_space(8.0);
        ui.horizontal_wrapped(|ui| {
            for area in areas {
                let selected = viewer.is_selected(&area.id);
                let frame = egui::Frame::none()
                    .fill(if selected { Color32::from_rgb(30, 41, 59) } else { Color32::from_rgb(24, 28, 40) })
                    .stroke(egui::Stroke::new(
                        2.0,
                        if selected { rgb(Rgb::BLUE) } else { Color32::from_gray(60) },
                    ))
                    .rounding(egui::Rounding::same(8.0))
                    .inner_margin(egui::Margin::same(10.0));

                let inner = frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(&area.label).strong());
                            ui.label(RichText::new(severity_caption(area.severity)).size(11.0).color(Color32::from_gray(160)));
                        });
                        let (dot, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                        ui.painter().circle_filled(dot.center(), 6.0, rgb(severity_tint(Some(area.severity))));
                    });
                });

                if inner.response.interact(egui::Sense::click()).clicked() {
                    viewer.pick_area(&area.id);
                }
            }
        });
    }

    fn render_report(&self, ui: &mut egui::Ui) {
        let Some(result) = self.state.session.result() else {
            return;
        };

        for section in sections(result) {
            let title = section.title();
            ui.group(|ui| {
                ui.set_min_width(ui.available_width());
                match section {
                    ReportSection::Summary { confidence_percent, condition_count } => {
                        ui.label(RichText::new(title).size(18.0).strong());
                        ui.label(RichText::new("Powered by deep learning algorithms").color(Color32::from_gray(160)));
                        egui::Grid::new("summary_grid").num_columns(2).show(ui, |ui| {
                            ui.label("Confidence Score");
                            ui.label(RichText::new(format!("{confidence_percent}%")).size(22.0).strong());
                            ui.end_row();
                            ui.label("Conditions Detected");
                            ui.label(RichText::new(condition_count.to_string()).size(22.0).strong());
                            ui.end_row();
                        });
                    }
                    ReportSection::Conditions(items) | ReportSection::Recommendations(items) => {
                        ui.label(RichText::new(title).strong());
                        for (i, item) in items.iter().enumerate() {
                            ui.horizontal_wrapped(|ui| {
                                ui.label(RichText::new(format!("{}.", i + 1)).strong());
                                ui.label(item.as_str());
                            });
                        }
                    }
                    ReportSection::ClinicalAnalysis(text) => {
                        ui.label(RichText::new(title).strong());
                        ui.label(text);
                    }
                    ReportSection::Disclaimer { body, .. } => {
                        ui.label(RichText::new(title).strong().color(rgb(Rgb::YELLOW)));
                        ui.label(RichText::new(body).size(11.0));
                    }
                }
            });
            ui.add_space(6.0);
        }
    }
}

fn rgb(color: Rgb) -> Color32 {
    Color32::from_rgb(color.0, color.1, color.2)
}

pub fn configure_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    let candidates = [
        r"C:\Windows\Fonts\meiryo.ttc",
        r"C:\Windows\Fonts\msgothic.ttc",
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ];

    for path in candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert("fallback".to_string(), FontData::from_owned(data));
            fonts.families
                .entry(FontFamily::Proportional)
                .or_default()
                .push("fallback".to_string());
            ctx.set_fonts(fonts);
            return;
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.analyze_rx.is_some() || self.state.collector.is_dragging() {
            ctx.request_repaint();
        }
        self.poll_messages();
        self.handle_drops(ctx);
        self.sync_texture(ctx);

        let phase = self.state.session.phase();

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let idle = !self.state.session.is_analyzing();
                    if ui.add_enabled(idle, egui::Button::new("Open X-ray...")).clicked() {
                        self.open_image();
                        ui.close_menu();
                    }
                    let has_result = self.state.session.result().is_some();
                    if ui.add_enabled(has_result, egui::Button::new("Save Result JSON...")).clicked() {
                        self.save_result_as();
                        ui.close_menu();
                    }
                    if ui.add_enabled(idle && phase != Phase::Idle, egui::Button::new("Reset")).clicked() {
                        self.reset();
                        ui.close_menu();
                    }
                });

                ui.separator();
                ui.label(RichText::new("MediScan AI").strong());
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(RichText::new(&self.status).color(Color32::from_gray(170)));
                }
            });
        });

        if phase == Phase::Complete {
            egui::SidePanel::right("report").resizable(true).default_width(360.0).show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_report(ui);
                });
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match phase {
                Phase::Idle => {
                    ui.heading("Upload X-ray Image");
                    ui.label("Upload a chest X-ray image to begin AI-powered analysis");
                    ui.separator();
                    self.render_upload(ui);
                }
                Phase::FileSelected | Phase::Analyzing => {
                    ui.heading("Upload X-ray Image");
                    ui.separator();
                    self.render_selected(ui);
                }
                Phase::Complete => {
                    ui.heading("Detected Anomalies");
                    ui.label("Interactive visualization of detected conditions");
                    ui.separator();
                    let areas = self
                        .state
                        .session
                        .result()
                        .map(|r| r.highlighted_areas.clone())
                        .unwrap_or_default();
                    self.render_viewer(ui, &areas);
                    ui.add_space(16.0);
                    ui.vertical_centered(|ui| {
                        if ui.button(RichText::new("Analyze Another X-ray").size(16.0)).clicked() {
                            self.reset();
                        }
                    });
                }
            });
        });
    }
}
