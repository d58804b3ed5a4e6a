//! HDRProbe Application
//!
//! Main application implementing the three-column layout with:
//! - Top bar: file actions, image info and loading status
//! - Left sidebar: exposure, gamma and false-color controls
//! - Center: tone-mapped preview with the annotation overlay
//! - Right sidebar: calibration, histogram and the annotation list
//!
//! All state lives in the [`Controller`]. The UI collects [`Event`]s while
//! it is built, feeds them to the controller afterwards, and runs the
//! returned [`Effect`]s. Backend calls go through a [`BackendWorker`].

use std::path::PathBuf;

use hdrprobe_client::{ClientConfig, HttpBackend};
use hdrprobe_core::{
    CalibrationState, CalibrationWorkflow, Controller, Effect, Event, Notification,
    SourceCoordinates,
};
use web_time::Instant;

use crate::constants::{
    COLORBAR_TEXTURE, IMAGE_EXTENSIONS, IMAGE_FILTER_NAME, PREVIEW_TEXTURE, TOAST_DURATION,
};
use crate::worker::BackendWorker;

// ============================================================================
// Transient UI state
// ============================================================================

/// A notification currently on screen.
pub(crate) struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

impl Toast {
    fn new(notification: Notification) -> Self {
        Self {
            notification,
            shown_at: Instant::now(),
        }
    }

    /// Time left before the toast disappears.
    pub fn remaining(&self) -> std::time::Duration {
        TOAST_DURATION.saturating_sub(self.shown_at.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// The reference-value dialog opened after a calibration pixel is picked.
pub(crate) struct ReferencePrompt {
    pub at: SourceCoordinates,
    pub input: String,
    /// Focus the text field on the first frame only
    pub focus_pending: bool,
}

impl ReferencePrompt {
    fn new(at: SourceCoordinates) -> Self {
        Self {
            at,
            input: String::new(),
            focus_pending: true,
        }
    }
}

/// GPU textures mirroring the controller's current frame.
#[derive(Default)]
pub(crate) struct FrameTextures {
    pub preview: Option<egui::TextureHandle>,
    pub colorbar: Option<egui::TextureHandle>,
    /// Set when the controller's frame may have changed
    dirty: bool,
}

// ============================================================================
// Application
// ============================================================================

/// Main application state.
pub struct HdrProbeApp {
    pub(crate) controller: Controller,
    worker: Option<BackendWorker>,
    pub(crate) textures: FrameTextures,
    pub(crate) toast: Option<Toast>,
    pub(crate) reference_prompt: Option<ReferencePrompt>,
    /// Image given on the command line, uploaded on the first frame
    startup_image: Option<PathBuf>,
}

impl HdrProbeApp {
    /// Create the application and start the backend worker.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        backend: ClientConfig,
        startup_image: Option<PathBuf>,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let worker = match BackendWorker::spawn(
            HttpBackend::new(backend),
            Box::new(move || ctx.request_repaint()),
        ) {
            Ok(worker) => Some(worker),
            Err(e) => {
                log::error!("Failed to start backend worker: {}", e);
                None
            }
        };

        Self {
            controller: Controller::new(),
            worker,
            textures: FrameTextures::default(),
            toast: None,
            reference_prompt: None,
            startup_image,
        }
    }

    /// Feed one event to the controller and run its effects.
    pub(crate) fn dispatch(&mut self, event: Event) {
        let frame_may_change = matches!(
            event,
            Event::UploadCompleted { .. } | Event::RenderCompleted { .. }
        );
        let effects = self.controller.update(event);
        if frame_may_change {
            self.textures.dirty = true;
        }
        for effect in effects {
            self.run_effect(effect);
        }
        retain_reference_prompt(&mut self.reference_prompt, self.controller.calibration());
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Request(request) => match &mut self.worker {
                Some(worker) => worker.submit(request),
                None => {
                    log::error!("Dropping {} request: no backend worker", request.operation());
                    self.show_toast(Notification::error("Backend worker is not running"));
                }
            },
            Effect::PromptReferenceValue { at } => {
                self.reference_prompt = Some(ReferencePrompt::new(at));
            }
            Effect::Notify(notification) => self.show_toast(notification),
        }
    }

    fn show_toast(&mut self, notification: Notification) {
        log::debug!("Notification: {}", notification.message);
        self.toast = Some(Toast::new(notification));
    }

    /// Dispatch every completion the worker has queued.
    fn drain_worker(&mut self) {
        while let Some(event) = self.worker.as_mut().and_then(BackendWorker::take_one_result) {
            self.dispatch(event);
        }
    }

    /// Upload the last file dropped onto the window, if any.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .rev()
                .find_map(|file| file.path.clone())
        });
        if let Some(path) = dropped {
            log::info!("File dropped: {:?}", path);
            self.dispatch(Event::UploadRequested(path));
        }
    }

    /// Reload textures from the controller's frame after it changed.
    fn sync_textures(&mut self, ctx: &egui::Context) {
        if !self.textures.dirty {
            return;
        }
        self.textures.dirty = false;

        let Some(frame) = self.controller.frame() else {
            self.textures.preview = None;
            self.textures.colorbar = None;
            return;
        };
        self.textures.preview = Some(load_texture(ctx, PREVIEW_TEXTURE, &frame.image));
        self.textures.colorbar = frame
            .colorbar
            .as_ref()
            .map(|colorbar| load_texture(ctx, COLORBAR_TEXTURE, colorbar));
    }
}

/// Close the prompt once the controller no longer waits for its value,
/// e.g. after a new image reset the calibration.
fn retain_reference_prompt(
    prompt: &mut Option<ReferencePrompt>,
    calibration: &CalibrationWorkflow,
) {
    let waiting = match (prompt.as_ref(), calibration.state()) {
        (Some(open), CalibrationState::AwaitingReferenceValue { target }) => open.at == target,
        (Some(_), _) => false,
        (None, _) => return,
    };
    if !waiting {
        log::debug!("Closing reference prompt: calibration no longer pending");
        *prompt = None;
    }
}

/// Show the native open dialog filtered to supported images.
pub(crate) fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open HDR image")
        .add_filter(IMAGE_FILTER_NAME, IMAGE_EXTENSIONS)
        .pick_file()
}

fn load_texture(
    ctx: &egui::Context,
    name: &str,
    raster: &hdrprobe_core::RasterImage,
) -> egui::TextureHandle {
    let size = [raster.width() as usize, raster.height() as usize];
    let image = egui::ColorImage::from_rgba_unmultiplied(size, raster.pixels());
    ctx.load_texture(name, image, egui::TextureOptions::LINEAR)
}

impl eframe::App for HdrProbeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(path) = self.startup_image.take() {
            self.dispatch(Event::UploadRequested(path));
        }
        self.drain_worker();
        self.handle_dropped_files(ctx);
        self.sync_textures(ctx);

        let mut events = Vec::new();
        self.build_topbar(ctx, &mut events);
        self.build_left_sidebar(ctx, &mut events);
        self.build_right_sidebar(ctx, &mut events);
        self.build_image_viewer(ctx, &mut events);
        self.build_histogram_dialog(ctx, &mut events);
        self.build_reference_prompt(ctx, &mut events);
        self.build_toast(ctx);

        for event in events {
            self.dispatch(event);
        }

        if let Some(toast) = &self.toast {
            if toast.is_expired() {
                self.toast = None;
            } else {
                ctx.request_repaint_after(toast.remaining());
            }
        }
    }
}
