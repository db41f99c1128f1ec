pub mod catalog;
pub mod manifest;
pub mod registry;

pub use catalog::{BodyDescriptor, AU, EARTH_RADIUS, SUN_RADIUS};
pub use manifest::TextureManifest;
pub use registry::BodyRegistry;
