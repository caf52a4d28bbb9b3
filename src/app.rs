use crate::config::AppConfig;
use crate::controller::{FilterController, SaveOutcome};
use crate::library::PhotoLibrary;
use crate::picker;
use crate::processing::FilterKind;

const RADIUS_MAX: f32 = 100.0;

pub struct InstafilterApp {
    controller: FilterController,
    library: PhotoLibrary,
    texture: Option<egui::TextureHandle>,
    shown_revision: u64,
    showing_filter_sheet: bool,
    show_no_image_alert: bool,
    config: AppConfig,
}

impl InstafilterApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let library = PhotoLibrary::from_config(&config);
        tracing::info!("saving pictures to {}", library.dir().display());
        Self {
            controller: FilterController::new(),
            library,
            texture: None,
            shown_revision: 0,
            showing_filter_sheet: false,
            show_no_image_alert: false,
            config,
        }
    }

    fn pick_and_load(&mut self) {
        let Some(path) = picker::pick_image_path(self.config.open_dir.as_deref()) else {
            return;
        };
        self.config.open_dir = path.parent().map(|p| p.to_path_buf());
        match picker::open_image(&path) {
            Ok(img) => self.controller.load_image(img),
            Err(err) => tracing::warn!("could not open {}: {:#}", path.display(), err),
        }
    }

    fn save_picture(&mut self) {
        match self.controller.save(&mut self.library) {
            SaveOutcome::Saved(path) => tracing::info!("Success! saved {}", path.display()),
            SaveOutcome::NoImage => self.show_no_image_alert = true,
            SaveOutcome::NotRendered => {}
            SaveOutcome::Failed(err) => tracing::warn!("Oops {}", err),
        }
    }

    /// Re-uploads the preview texture when the controller published a new output.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        if self.controller.revision() == self.shown_revision {
            return;
        }
        self.shown_revision = self.controller.revision();
        let Some(img) = self.controller.preview() else {
            return;
        };
        let rgba = img.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        match self.texture.as_mut() {
            Some(tex) => tex.set(color, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("instafilter_preview", color, egui::TextureOptions::LINEAR));
            }
        }
        ctx.request_repaint();
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        let snapshot = self.controller.snapshot();
        let label_width = 70.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Intensity"));
            let mut intensity = snapshot.params.intensity;
            ui.spacing_mut().slider_width = (ui.available_width() - 8.0).max(80.0);
            let resp = ui.add(
                egui::Slider::new(&mut intensity, 0.0_f32..=1.0_f32)
                    .show_value(false)
                    .clamping(egui::SliderClamping::Always),
            );
            if resp.changed() {
                self.controller.set_intensity(intensity);
            }
        });
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Radius"));
            let mut radius = snapshot.params.radius;
            ui.spacing_mut().slider_width = (ui.available_width() - 8.0).max(80.0);
            let resp = ui.add(
                egui::Slider::new(&mut radius, 0.0_f32..=RADIUS_MAX)
                    .show_value(false)
                    .clamping(egui::SliderClamping::Always),
            );
            if resp.changed() {
                self.controller.set_radius(radius);
            }
        });
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui.button(self.controller.selection_label()).clicked() {
                self.showing_filter_sheet = true;
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Save the picture").clicked() {
                    self.save_picture();
                }
            });
        });
    }

    fn show_picture(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, egui::Color32::from_gray(120));

        if let Some(tex) = self.texture.as_ref() {
            let tex_size = tex.size_vec2();
            let scale = (rect.width() / tex_size.x).min(rect.height() / tex_size.y);
            let fitted = egui::Rect::from_center_size(rect.center(), tex_size * scale);
            painter.image(
                tex.id(),
                fitted,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        } else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Tap to select picture",
                egui::FontId::proportional(18.0),
                egui::Color32::WHITE,
            );
        }

        if response.clicked() {
            self.pick_and_load();
        }
    }

    fn show_filter_sheet(&mut self, ctx: &egui::Context) {
        if !self.showing_filter_sheet {
            return;
        }
        let mut chosen: Option<FilterKind> = None;
        let mut dismissed = false;
        egui::Window::new("Select a filter")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
            .show(ctx, |ui| {
                for kind in FilterKind::ALL {
                    if ui
                        .add_sized([240.0, 28.0], egui::Button::new(kind.label()))
                        .clicked()
                    {
                        chosen = Some(kind);
                    }
                }
                ui.separator();
                if ui.add_sized([240.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    dismissed = true;
                }
            });

        if let Some(kind) = chosen {
            self.controller.select_filter(kind);
            self.showing_filter_sheet = false;
        } else if dismissed {
            self.showing_filter_sheet = false;
        }
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        if !self.show_no_image_alert {
            return;
        }
        egui::Window::new("No Image Selected")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Please select an image to save");
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    self.show_no_image_alert = false;
                }
            });
    }
}

impl eframe::App for InstafilterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window size for saving on exit
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.config.window_width = Some(rect.width());
            self.config.window_height = Some(rect.height());
        }

        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            ui.heading("Instafilter");
        });

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(8.0);
            self.show_controls(ui);
            ui.add_space(8.0);
        });

        self.show_filter_sheet(ctx);
        self.show_alert(ctx);

        // Slider and menu handlers above may have re-rendered.
        self.sync_texture(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_picture(ui);
        });

        // A pick made this frame shows on the next repaint.
        self.sync_texture(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.config.save();
    }
}
