//! UI building modules for the HDRProbe application.
//!
//! Each module contains `impl HdrProbeApp` blocks that extend the main
//! application struct with UI building methods. Builders never touch the
//! controller directly; they push [`hdrprobe_core::Event`]s that the app
//! dispatches once the frame is laid out.

mod histogram_dialog;
mod image_viewer;
mod left_sidebar;
mod reference_prompt;
mod right_sidebar;
mod toast;
mod topbar;
