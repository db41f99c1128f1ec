use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Unique identifier for a node in the scene (bodies and their containers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Identity of one texture acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u32);

/// Handed to the host with every fetch. Only a ticket matching the live
/// attempt of a live request is honoured when the fetch settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchTicket {
    pub request: RequestId,
    pub attempt: u32,
}

/// An event communicated from Rust to the host.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ViewerEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl ViewerEvent {
    pub const FLOATS: usize = 4;

    /// a = percent, b = completed, c = total.
    pub const PROGRESS: f32 = 1.0;
    /// All textures resolved. Fires once per session.
    pub const READY: f32 = 2.0;
    /// a = focused entity, b = planet whose moon list the UI should show.
    pub const FOCUSED: f32 = 3.0;
    pub const TRACKING_STOPPED: f32 = 4.0;
    /// a = body entity, b = request id. Pixels are read through the texture accessors.
    pub const TEXTURE_APPLIED: f32 = 5.0;
    /// a = preset index.
    pub const PRESET_APPLIED: f32 = 6.0;
    /// The opening camera flight finished and orbit controls are live.
    pub const INTRO_FINISHED: f32 = 7.0;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }

    pub fn progress(percent: u32, completed: u32, total: u32) -> Self {
        Self::new(Self::PROGRESS, percent as f32, completed as f32, total as f32)
    }

    pub fn ready() -> Self {
        Self::new(Self::READY, 0.0, 0.0, 0.0)
    }

    pub fn focused(entity: EntityId, panel: EntityId) -> Self {
        Self::new(Self::FOCUSED, entity.0 as f32, panel.0 as f32, 0.0)
    }

    pub fn tracking_stopped() -> Self {
        Self::new(Self::TRACKING_STOPPED, 0.0, 0.0, 0.0)
    }

    pub fn texture_applied(entity: EntityId, request: RequestId) -> Self {
        Self::new(Self::TEXTURE_APPLIED, entity.0 as f32, request.0 as f32, 0.0)
    }

    pub fn preset_applied(index: u32) -> Self {
        Self::new(Self::PRESET_APPLIED, index as f32, 0.0, 0.0)
    }

    pub fn intro_finished() -> Self {
        Self::new(Self::INTRO_FINISHED, 0.0, 0.0, 0.0)
    }
}
