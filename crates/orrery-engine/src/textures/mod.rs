// textures/mod.rs
//
// Texture acquisition with ordered fallbacks, and the procedural painter
// that stands in when every source fails.

pub mod canvas;
pub mod font;
pub mod image;
pub mod palette;
pub mod patterns;
pub mod pipeline;
pub mod progress;
pub mod synth;

pub use self::image::TextureImage;
pub use pipeline::{
    AttemptOutcome, AttemptRecord, PipelineStats, RecordingFetcher, RequestState, ResolvedTexture,
    TextureFetcher, TexturePipeline,
};
pub use progress::{LoadProgress, ProgressUpdate};
pub use synth::{synthesize, TextureSynthesizer};
