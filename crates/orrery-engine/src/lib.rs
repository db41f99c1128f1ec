pub mod api;
pub mod core;
pub mod error;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod textures;
pub mod navigation;
pub mod ui;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::ViewerConfig;
pub use api::types::{EntityId, FetchTicket, RequestId, ViewerEvent};
pub use api::viewer::Viewer;
pub use error::{OrreryError, TextureError};
pub use assets::catalog::BodyDescriptor;
pub use assets::manifest::TextureManifest;
pub use assets::registry::BodyRegistry;
pub use core::composer::{ComposeReport, SceneComposer};
pub use core::rng::Rng;
pub use core::scene::{SceneEntity, SolarScene};
pub use core::time::FixedTimestep;
pub use renderer::camera::Camera3D;
pub use renderer::controls::{ControlLimits, OrbitControls};
pub use renderer::instance::{InstanceBuffer, NodeInstance};
pub use renderer::traits::{
    Anchor, LineDesc, MaterialDesc, PointsDesc, RecordingBackend, RenderBackend, RingDesc, SphereDesc,
};
pub use input::queue::{InputEvent, InputQueue, NavCommand};
pub use bridge::protocol::{FrameBuffer, FrameHeader, ProtocolLayout};
pub use navigation::{CameraNavigator, FocusOutcome, IntroFlight, NavState, ViewPreset};
pub use textures::image::TextureImage;
pub use textures::pipeline::{RecordingFetcher, TextureFetcher, TexturePipeline};
pub use textures::progress::LoadProgress;
pub use textures::synth::TextureSynthesizer;
pub use ui::notices::{HostNotice, Notice, NoticeBoard, NoticeLevel};
pub use systems::starfield::Twinkle;

// Extensions: math helpers independent of the viewer
pub use extensions::{ease, ease_vec3, lerp, Easing, LocalTransform, TransformGraph};
