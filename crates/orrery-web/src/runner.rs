use serde::Serialize;

use orrery_engine::{
    EntityId, FetchTicket, HostNotice, InputEvent, LineDesc, NavCommand, OrreryError, PointsDesc,
    ProtocolLayout, RenderBackend, RequestId, RingDesc, SphereDesc, TextureError, TextureFetcher,
    TextureImage, TextureManifest, ViewPreset, Viewer, ViewerConfig,
};

/// A fetch the host should start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchRequest {
    pub request: u32,
    pub attempt: u32,
    pub url: String,
}

/// Fetcher that queues work for the host, which polls it after every call
/// into the viewer.
#[derive(Debug, Default)]
pub struct HostFetcher {
    requests: Vec<FetchRequest>,
    cancellations: Vec<FetchRequest>,
}

impl TextureFetcher for HostFetcher {
    fn begin(&mut self, ticket: FetchTicket, url: &str) {
        self.requests.push(FetchRequest {
            request: ticket.request.0,
            attempt: ticket.attempt,
            url: url.to_string(),
        });
    }

    fn abandon(&mut self, ticket: FetchTicket) {
        // A request started and abandoned before the host polled never leaves Rust.
        let before = self.requests.len();
        self.requests
            .retain(|r| !(r.request == ticket.request.0 && r.attempt == ticket.attempt));
        if self.requests.len() == before {
            self.cancellations.push(FetchRequest {
                request: ticket.request.0,
                attempt: ticket.attempt,
                url: String::new(),
            });
        }
    }
}

/// Scene construction forwarded to the host renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneCommand {
    Body(SphereDesc),
    Ring(RingDesc),
    Line(LineDesc),
    Points(PointsDesc),
    /// Pixels are read with `texture_pixels_ptr(node)`.
    Texture { node: u32, width: u32, height: u32 },
}

#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<SceneCommand>,
}

impl RenderBackend for CommandRecorder {
    fn create_body(&mut self, sphere: &SphereDesc) {
        self.commands.push(SceneCommand::Body(sphere.clone()));
    }

    fn create_ring(&mut self, ring: &RingDesc) {
        self.commands.push(SceneCommand::Ring(ring.clone()));
    }

    fn create_line(&mut self, line: &LineDesc) {
        self.commands.push(SceneCommand::Line(line.clone()));
    }

    fn create_points(&mut self, points: &PointsDesc) {
        self.commands.push(SceneCommand::Points(points.clone()));
    }

    fn set_texture(&mut self, node: EntityId, image: &TextureImage) {
        self.commands.push(SceneCommand::Texture {
            node: node.0,
            width: image.width(),
            height: image.height(),
        });
    }
}

/// Owns the viewer plus the host-facing outboxes.
///
/// The browser entry points in `lib.rs` keep one runner in a `thread_local!`
/// and forward every export here, because wasm-bindgen cannot export
/// stateful structs with borrowed trait objects directly.
pub struct ViewerRunner {
    viewer: Viewer,
    fetcher: HostFetcher,
    backend: CommandRecorder,
    layout: ProtocolLayout,
}

impl ViewerRunner {
    /// Build a runner from host JSON. Blank strings select the defaults.
    pub fn new(config_json: &str, manifest_json: &str) -> Result<Self, OrreryError> {
        let config = ViewerConfig::from_json(config_json)?;
        let layout = ProtocolLayout::new(config.max_instances, config.max_events);
        let mut viewer = Viewer::new(config)?;
        if !manifest_json.trim().is_empty() {
            let mut manifest = TextureManifest::builtin();
            manifest.merge(TextureManifest::from_json(manifest_json)?);
            viewer.set_manifest(manifest);
        }
        Ok(Self {
            viewer,
            fetcher: HostFetcher::default(),
            backend: CommandRecorder::default(),
            layout,
        })
    }

    /// Compose the scene. Scene commands and fetch requests are queued for the host.
    pub fn init(&mut self) -> Result<(), OrreryError> {
        let report = self.viewer.compose(&mut self.backend, &mut self.fetcher)?;
        log::info!(
            "Scene composed: {} bodies, {} texture requests",
            report.bodies.len(),
            report.requests.len()
        );
        Ok(())
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.viewer.push_input(event);
    }

    pub fn tick(&mut self, dt: f32) {
        self.viewer.tick(dt, &mut self.fetcher, &mut self.backend);
    }

    // ---- Texture callbacks ----

    /// Encoded image bytes arrived for `request`/`attempt`.
    pub fn texture_loaded(&mut self, request: u32, attempt: u32, bytes: &[u8]) -> bool {
        let outcome = TextureImage::decode(bytes);
        self.complete(request, attempt, outcome)
    }

    /// Already-decoded RGBA pixels, for hosts that decode with the browser.
    pub fn texture_pixels_loaded(&mut self, request: u32, attempt: u32, width: u32, height: u32, rgba: Vec<u8>) -> bool {
        let outcome = TextureImage::from_raw(width, height, rgba);
        self.complete(request, attempt, outcome)
    }

    pub fn texture_failed(&mut self, request: u32, attempt: u32, message: &str) -> bool {
        self.complete(request, attempt, Err(TextureError::Fetch(message.to_string())))
    }

    pub fn texture_progress(&mut self, request: u32, attempt: u32, loaded: f64, total: f64) {
        let ticket = FetchTicket { request: RequestId(request), attempt };
        self.viewer.report_download(ticket, loaded.max(0.0) as u64, total.max(0.0) as u64);
    }

    fn complete(&mut self, request: u32, attempt: u32, outcome: Result<TextureImage, TextureError>) -> bool {
        let ticket = FetchTicket { request: RequestId(request), attempt };
        self.viewer
            .complete_fetch(ticket, outcome, &mut self.fetcher, &mut self.backend)
    }

    // ---- Navigation ----

    pub fn focus(&mut self, name: &str) -> bool {
        match self.viewer.focus(name) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("focus({}) failed: {}", name, e);
                false
            }
        }
    }

    pub fn stop_tracking(&mut self) {
        self.viewer.stop_tracking();
    }

    /// Queue a preset by name ("default", "overview", "top", "sun", "reset").
    pub fn apply_preset(&mut self, name: &str) -> bool {
        match ViewPreset::from_name(name) {
            Some(preset) => {
                self.viewer.push_input(InputEvent::Command(NavCommand::Preset(preset)));
                true
            }
            None => {
                log::warn!("Unknown view preset: {}", name);
                false
            }
        }
    }

    // ---- Outboxes (JSON) ----

    pub fn take_fetch_requests(&mut self) -> String {
        to_json(&std::mem::take(&mut self.fetcher.requests))
    }

    pub fn take_fetch_cancellations(&mut self) -> String {
        to_json(&std::mem::take(&mut self.fetcher.cancellations))
    }

    pub fn take_scene_commands(&mut self) -> String {
        to_json(&std::mem::take(&mut self.backend.commands))
    }

    pub fn take_notices(&mut self) -> String {
        let notices: Vec<HostNotice> = self.viewer.drain_notices();
        to_json(&notices)
    }

    // ---- Texture pixel accessors ----

    pub fn texture_width(&self, node: u32) -> u32 {
        self.viewer.texture(EntityId(node)).map_or(0, |t| t.width())
    }

    pub fn texture_height(&self, node: u32) -> u32 {
        self.viewer.texture(EntityId(node)).map_or(0, |t| t.height())
    }

    pub fn texture_pixels_ptr(&self, node: u32) -> *const u8 {
        self.viewer
            .texture(EntityId(node))
            .map_or(std::ptr::null(), |t| t.as_bytes().as_ptr())
    }

    pub fn texture_pixels_len(&self, node: u32) -> u32 {
        self.viewer.texture(EntityId(node)).map_or(0, |t| t.as_bytes().len() as u32)
    }

    // ---- Frame buffer accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.viewer.frame().as_ptr()
    }

    pub fn frame_len(&self) -> u32 {
        self.viewer.frame().len() as u32
    }

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn instance_data_offset(&self) -> u32 {
        self.layout.instance_data_offset as u32
    }

    pub fn event_data_offset(&self) -> u32 {
        self.layout.event_data_offset as u32
    }

    pub fn load_percent(&self) -> u32 {
        self.viewer.progress().percent()
    }

    pub fn is_ready(&self) -> bool {
        self.viewer.progress().is_ready()
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("serialization failed: {}", e);
        "[]".to_string()
    })
}
