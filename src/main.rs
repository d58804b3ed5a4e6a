/// Main HDRProbe application entry point
fn main() {
    use hdrprobe::HdrProbeApp;
    use hdrprobe::config::AppConfig;
    use hdrprobe::ui_constants::window;

    let (mut config, warnings) = AppConfig::load_or_default();
    config.apply_env_overrides();

    // RUST_LOG still wins over the configured level
    let _ = env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .try_init();
    for warning in &warnings {
        log::warn!("{}", warning);
    }
    log::info!("Using backend at {}", config.backend.base_url);

    let startup_image = std::env::args_os().nth(1).map(std::path::PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                config.preferences.window_width,
                config.preferences.window_height,
            ])
            .with_min_inner_size([window::MIN_SIZE.0, window::MIN_SIZE.1])
            .with_title(window::TITLE)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let backend = config.backend.clone();
    let result = eframe::run_native(
        window::TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(HdrProbeApp::new(cc, backend, startup_image)))),
    );

    if let Err(e) = result {
        eprintln!("Application error: {}", e);
    }
}
