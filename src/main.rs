mod app;
mod config;
mod controller;
mod library;
mod picker;
mod processing;

use app::InstafilterApp;
use config::AppConfig;

const DEFAULT_WINDOW_SIZE: [f32; 2] = [520.0, 860.0];

fn window_size(config: &AppConfig) -> [f32; 2] {
    let width = config
        .window_width
        .filter(|w| *w >= 200.0)
        .unwrap_or(DEFAULT_WINDOW_SIZE[0]);
    let height = config
        .window_height
        .filter(|h| *h >= 200.0)
        .unwrap_or(DEFAULT_WINDOW_SIZE[1]);
    [width, height]
}

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Instafilter")
            .with_app_id("instafilter")
            .with_inner_size(window_size(&config)),
        ..Default::default()
    };

    eframe::run_native(
        "instafilter",
        native_options,
        Box::new(|cc| Ok(Box::new(InstafilterApp::new(cc, config)))),
    )
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_WINDOW_SIZE, window_size};
    use crate::config::AppConfig;

    #[test]
    fn window_size_uses_saved_dimensions() {
        let config = AppConfig {
            window_width: Some(640.0),
            window_height: Some(900.0),
            ..Default::default()
        };
        assert_eq!(window_size(&config), [640.0, 900.0]);
    }

    #[test]
    fn window_size_ignores_collapsed_values() {
        let config = AppConfig {
            window_width: Some(0.0),
            window_height: None,
            ..Default::default()
        };
        assert_eq!(window_size(&config), DEFAULT_WINDOW_SIZE);
    }
}
