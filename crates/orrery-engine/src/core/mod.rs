pub mod composer;
pub mod rng;
pub mod scene;
pub mod time;

pub use composer::{ComposeReport, SceneComposer};
pub use rng::Rng;
pub use scene::{SceneEntity, SolarScene};
pub use time::FixedTimestep;
