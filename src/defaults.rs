//! Default tolerances and annotation style

use crate::types::Rgb;

pub const EPS_POS: f64 = 0.002;
pub const EPS_ANGLE: f64 = 0.001;
pub const EPS_STRETCH: f64 = 0.001;

pub const LINE_WIDTH: f64 = 5.0;
pub const ANCHOR_RADIUS: f64 = 7.0;
pub const BASELINE_DASH: [f64; 2] = [20.0, 7.0];

pub const COLOR_OK: Rgb = Rgb::new(0, 65000, 0);
pub const COLOR_STRETCHED: Rgb = Rgb::new(0, 0, 65000);
pub const COLOR_DIAMOND: Rgb = Rgb::new(65000, 0, 0);

/// Root element name of the item note
pub const NOTE_ROOT: &str = "LaTeX2AI_item";
/// Version written into item notes
pub const NOTE_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Version assumed for notes that do not carry one
pub const NOTE_VERSION_UNKNOWN: &str = "0.0.0";
