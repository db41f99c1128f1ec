pub mod camera;
pub mod controls;
pub mod instance;
pub mod traits;

pub use camera::{Camera3D, CameraUniform};
pub use controls::{ControlLimits, OrbitControls};
pub use instance::{InstanceBuffer, NodeInstance};
pub use traits::{Anchor, LineDesc, MaterialDesc, PointsDesc, RecordingBackend, RenderBackend, RingDesc, SphereDesc};
