/// Frame buffer layout.
/// Must stay in sync with the host's `protocol.js`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 20 floats]
/// [Instances: max_instances × 12 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written into the header so the host can compute offsets.
use crate::api::types::ViewerEvent;
use crate::renderer::instance::NodeInstance;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 20;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_MAX_EVENTS: usize = 4;
pub const HEADER_EVENT_COUNT: usize = 5;
pub const HEADER_CAMERA_X: usize = 6;
pub const HEADER_CAMERA_Y: usize = 7;
pub const HEADER_CAMERA_Z: usize = 8;
pub const HEADER_TARGET_X: usize = 9;
pub const HEADER_TARGET_Y: usize = 10;
pub const HEADER_TARGET_Z: usize = 11;
pub const HEADER_FOV: usize = 12;
pub const HEADER_SCENE_YAW: usize = 13;
pub const HEADER_TWINKLE_OPACITY: usize = 14;
pub const HEADER_TWINKLE_SIZE: usize = 15;
pub const HEADER_TWINKLE_SCALE: usize = 16;
pub const HEADER_PROGRESS_PERCENT: usize = 17;
/// 1.0 once every texture has resolved.
pub const HEADER_READY: usize = 18;
/// Tracked node id, 0 when free.
pub const HEADER_TRACKING: usize = 19;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per node instance (wire format).
pub const INSTANCE_FLOATS: usize = NodeInstance::FLOATS;

/// Floats per viewer event: kind, a, b, c (wire format).
pub const EVENT_FLOATS: usize = ViewerEvent::FLOATS;

/// Per-frame scalar state carried in the header.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameHeader {
    pub frame: u64,
    pub camera: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
    pub scene_yaw: f32,
    pub twinkle_opacity: f32,
    pub twinkle_size: f32,
    pub twinkle_scale: f32,
    pub progress_percent: u32,
    pub ready: bool,
    pub tracking: Option<u32>,
}

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_events: usize,

    /// Size of instance data section in floats.
    pub instance_data_floats: usize,
    /// Size of event data section in floats.
    pub event_data_floats: usize,

    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_events: usize) -> Self {
        let instance_data_floats = max_instances * INSTANCE_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let instance_data_offset = HEADER_FLOATS;
        let event_data_offset = instance_data_offset + instance_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_instances,
            max_events,
            instance_data_floats,
            event_data_floats,
            instance_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }
}

/// One contiguous f32 buffer per the layout, rewritten every frame.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    layout: ProtocolLayout,
    data: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(layout: ProtocolLayout) -> Self {
        let data = vec![0.0; layout.buffer_total_floats];
        Self { layout, data }
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    /// Write a whole frame. Instances or events beyond capacity are dropped
    /// with a warning; the header counts reflect what was written.
    pub fn write(&mut self, header: &FrameHeader, instances: &[NodeInstance], events: &[ViewerEvent]) {
        let instance_count = instances.len().min(self.layout.max_instances);
        if instance_count < instances.len() {
            log::warn!(
                "Frame instance capacity {} exceeded; dropping {}",
                self.layout.max_instances,
                instances.len() - instance_count
            );
        }
        let event_count = events.len().min(self.layout.max_events);
        if event_count < events.len() {
            log::warn!(
                "Frame event capacity {} exceeded; dropping {}",
                self.layout.max_events,
                events.len() - event_count
            );
        }

        let h = &mut self.data[..HEADER_FLOATS];
        h.fill(0.0);
        h[HEADER_FRAME_COUNTER] = header.frame as f32;
        h[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        h[HEADER_MAX_INSTANCES] = self.layout.max_instances as f32;
        h[HEADER_INSTANCE_COUNT] = instance_count as f32;
        h[HEADER_MAX_EVENTS] = self.layout.max_events as f32;
        h[HEADER_EVENT_COUNT] = event_count as f32;
        h[HEADER_CAMERA_X..=HEADER_CAMERA_Z].copy_from_slice(&header.camera);
        h[HEADER_TARGET_X..=HEADER_TARGET_Z].copy_from_slice(&header.target);
        h[HEADER_FOV] = header.fov_degrees;
        h[HEADER_SCENE_YAW] = header.scene_yaw;
        h[HEADER_TWINKLE_OPACITY] = header.twinkle_opacity;
        h[HEADER_TWINKLE_SIZE] = header.twinkle_size;
        h[HEADER_TWINKLE_SCALE] = header.twinkle_scale;
        h[HEADER_PROGRESS_PERCENT] = header.progress_percent as f32;
        h[HEADER_READY] = if header.ready { 1.0 } else { 0.0 };
        h[HEADER_TRACKING] = header.tracking.map_or(0.0, |id| id as f32);

        let start = self.layout.instance_data_offset;
        let floats: &[f32] = bytemuck::cast_slice(&instances[..instance_count]);
        self.data[start..start + floats.len()].copy_from_slice(floats);

        let start = self.layout.event_data_offset;
        let floats: &[f32] = bytemuck::cast_slice(&events[..event_count]);
        self.data[start..start + floats.len()].copy_from_slice(floats);
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Raw pointer for host-side reads out of linear memory.
    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;

    #[test]
    fn layout_offsets_are_contiguous() {
        let layout = ProtocolLayout::new(64, 32);
        assert_eq!(layout.instance_data_offset, HEADER_FLOATS);
        assert_eq!(layout.instance_data_floats, 64 * 12);
        assert_eq!(layout.event_data_offset, HEADER_FLOATS + 64 * 12);
        assert_eq!(layout.buffer_total_floats, HEADER_FLOATS + 64 * 12 + 32 * 4);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn header_fields_land_at_their_indices() {
        let mut buf = FrameBuffer::new(ProtocolLayout::new(4, 4));
        let header = FrameHeader {
            frame: 12,
            camera: [1.0, 2.0, 3.0],
            target: [4.0, 5.0, 6.0],
            fov_degrees: 80.0,
            scene_yaw: 0.2,
            twinkle_opacity: 0.6,
            twinkle_size: 2.5,
            twinkle_scale: 1.0,
            progress_percent: 47,
            ready: false,
            tracking: Some(9),
        };
        buf.write(&header, &[], &[ViewerEvent::ready()]);
        let d = buf.as_slice();
        assert_eq!(d[HEADER_FRAME_COUNTER], 12.0);
        assert_eq!(d[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(&d[HEADER_CAMERA_X..=HEADER_CAMERA_Z], &[1.0, 2.0, 3.0]);
        assert_eq!(&d[HEADER_TARGET_X..=HEADER_TARGET_Z], &[4.0, 5.0, 6.0]);
        assert_eq!(d[HEADER_PROGRESS_PERCENT], 47.0);
        assert_eq!(d[HEADER_TRACKING], 9.0);
        assert_eq!(d[HEADER_EVENT_COUNT], 1.0);
        assert_eq!(d[buf.layout().event_data_offset], ViewerEvent::READY);
    }

    #[test]
    fn overflow_is_truncated() {
        let mut buf = FrameBuffer::new(ProtocolLayout::new(2, 1));
        let instances = vec![NodeInstance::hidden(EntityId(3), 1.0); 5];
        let events = vec![ViewerEvent::ready(); 3];
        buf.write(&FrameHeader::default(), &instances, &events);
        let d = buf.as_slice();
        assert_eq!(d[HEADER_INSTANCE_COUNT], 2.0);
        assert_eq!(d[HEADER_EVENT_COUNT], 1.0);
        assert_eq!(d[HEADER_FLOATS], 3.0);
        assert_eq!(buf.len(), HEADER_FLOATS + 2 * 12 + 4);
    }
}
