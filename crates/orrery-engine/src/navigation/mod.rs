pub mod intro;
pub mod navigator;

pub use intro::{IntroFlight, IntroPose};
pub use navigator::{tracking_offset, viewing_distance, CameraNavigator, FocusOutcome, NavState, ViewPreset};
