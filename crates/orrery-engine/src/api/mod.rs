pub mod config;
pub mod types;
pub mod viewer;

pub use config::ViewerConfig;
pub use types::{EntityId, FetchTicket, RequestId, ViewerEvent};
pub use viewer::Viewer;
