use thiserror::Error;

use crate::api::types::EntityId;

/// Errors raised by the viewer core.
#[derive(Debug, Error)]
pub enum OrreryError {
    /// A navigation or lookup named a body that is not in the registry.
    #[error("unknown body: {0}")]
    UnknownBody(String),
    /// A transform query referenced a node that was never registered.
    #[error("transform node {0:?} is not registered")]
    UnknownNode(EntityId),
    /// Walking up the parent chain revisited a node.
    #[error("transform cycle through node {0:?}")]
    TransformCycle(EntityId),
    /// A local transform produced NaN or infinity.
    #[error("non-finite transform on node {0:?}")]
    NonFiniteTransform(EntityId),
    /// The body catalog failed validation.
    #[error("invalid body registry: {0}")]
    Registry(String),
    /// Config or manifest JSON could not be parsed.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single texture attempt did not produce an image.
#[derive(Debug, Error)]
pub enum TextureError {
    /// The host reported a network or loader error.
    #[error("fetch failed: {0}")]
    Fetch(String),
    /// The bytes arrived but are not a readable image.
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
    /// A raw RGBA buffer did not match its declared dimensions.
    #[error("pixel buffer of {len} bytes does not fit {width}x{height} rgba")]
    BadPixels { width: u32, height: u32, len: usize },
}
