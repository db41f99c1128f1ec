// extensions/mod.rs
//
// Math helpers decoupled from the scene: easing curves and the transform hierarchy.

pub mod easing;
pub mod transform;

pub use easing::{ease, ease_vec3, lerp, Easing};
pub use transform::{LocalTransform, TransformGraph};
