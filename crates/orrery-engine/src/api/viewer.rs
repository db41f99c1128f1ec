use std::collections::HashMap;

use glam::{Vec2, Vec3};

use crate::api::config::ViewerConfig;
use crate::api::types::{EntityId, FetchTicket, ViewerEvent};
use crate::assets::manifest::TextureManifest;
use crate::assets::registry::BodyRegistry;
use crate::bridge::protocol::{FrameBuffer, FrameHeader, ProtocolLayout};
use crate::core::composer::{ComposeReport, SceneComposer};
use crate::core::rng::Rng;
use crate::core::scene::SolarScene;
use crate::core::time::FixedTimestep;
use crate::error::{OrreryError, TextureError};
use crate::input::queue::{InputEvent, InputQueue, NavCommand};
use crate::navigation::intro::{IntroFlight, IntroPose};
use crate::navigation::navigator::{CameraNavigator, FocusOutcome, NavState, ViewPreset};
use crate::renderer::camera::Camera3D;
use crate::renderer::controls::OrbitControls;
use crate::renderer::instance::InstanceBuffer;
use crate::renderer::traits::RenderBackend;
use crate::systems::starfield::Twinkle;
use crate::textures::image::TextureImage;
use crate::textures::pipeline::{TextureFetcher, TexturePipeline};
use crate::textures::progress::LoadProgress;
use crate::textures::synth::TextureSynthesizer;
use crate::ui::notices::{HostNotice, Notice, NoticeBoard};

/// Composition root. Owns every piece of mutable viewer state.
///
/// Lifecycle: `new` → optional `set_manifest` → `compose` once → `tick` per
/// display frame, with `complete_fetch` whenever the host settles a fetch.
pub struct Viewer {
    config: ViewerConfig,
    registry: BodyRegistry,
    manifest: TextureManifest,
    scene: SolarScene,
    pipeline: TexturePipeline,
    progress: LoadProgress,
    navigator: CameraNavigator,
    intro: IntroFlight,
    controls: OrbitControls,
    camera: Camera3D,
    input: InputQueue,
    timestep: FixedTimestep,
    notices: NoticeBoard,
    rng: Rng,
    /// Events raised since the last frame was written.
    pending_events: Vec<ViewerEvent>,
    /// Events of the last written frame.
    frame_events: Vec<ViewerEvent>,
    instances: InstanceBuffer,
    frame: FrameBuffer,
    /// Applied texture per body node.
    textures: HashMap<EntityId, TextureImage>,
    twinkle: Twinkle,
    /// Wall-clock seconds since compose.
    elapsed: f32,
    frame_counter: u64,
    composed: bool,
    intro_done: bool,
}

impl Viewer {
    /// Viewer over the built-in solar system and texture table.
    pub fn new(config: ViewerConfig) -> Result<Self, OrreryError> {
        Ok(Self::with_registry(config, BodyRegistry::solar_system()?, TextureManifest::builtin()))
    }

    pub fn with_registry(config: ViewerConfig, registry: BodyRegistry, manifest: TextureManifest) -> Self {
        let synthesizer = TextureSynthesizer::new(config.fallback_size, config.seed);
        let mut camera = Camera3D::new(config.fov_degrees, 1.0, config.near, config.far);
        camera.set_smoothing(config.tracking_smoothing);
        let intro = IntroFlight::new(config.intro_duration, config.fov_degrees);
        let layout = ProtocolLayout::new(config.max_instances, config.max_events);

        Self {
            pipeline: TexturePipeline::new(config.texture_timeout, synthesizer),
            progress: LoadProgress::new(registry.len() as u32),
            scene: SolarScene::new(),
            navigator: CameraNavigator::new(),
            intro,
            controls: OrbitControls::new(config.controls),
            camera,
            input: InputQueue::new(),
            timestep: FixedTimestep::new(config.fixed_dt),
            notices: NoticeBoard::new(config.notice_timings()),
            // Distinct stream from the synthesizer's.
            rng: Rng::new(config.seed.rotate_left(17) ^ 0x9e37_79b9),
            pending_events: Vec::new(),
            frame_events: Vec::new(),
            instances: InstanceBuffer::new(),
            frame: FrameBuffer::new(layout),
            textures: HashMap::new(),
            twinkle: Twinkle::at(0.0),
            elapsed: 0.0,
            frame_counter: 0,
            composed: false,
            intro_done: false,
            registry,
            manifest,
            config,
        }
    }

    /// Replace the texture source table. Only effective before `compose`.
    pub fn set_manifest(&mut self, manifest: TextureManifest) {
        if self.composed {
            log::warn!("Texture manifest replaced after composition; ignored");
            return;
        }
        self.manifest = manifest;
    }

    /// Build the scene, describe it to `backend` and start every texture request.
    /// Calling it again is a no-op.
    pub fn compose(
        &mut self,
        backend: &mut dyn RenderBackend,
        fetcher: &mut dyn TextureFetcher,
    ) -> Result<ComposeReport, OrreryError> {
        if self.composed {
            return Ok(ComposeReport::default());
        }
        let report = SceneComposer::new(&self.registry, &self.manifest)
            .with_star_density(self.config.star_density)
            .compose(&mut self.scene, &mut self.pipeline, backend, fetcher, &mut self.rng)?;
        self.composed = true;

        let start = self.intro.start_pose();
        self.apply_intro_pose(&start);
        self.controls.set_enabled(false);
        if self.config.intro_duration <= 0.0 {
            self.end_intro();
        }

        if self.progress.fire_if_complete() {
            self.notices.post(Notice::Debug("Nothing to load".to_string()));
            self.pending_events.push(ViewerEvent::ready());
        }
        self.collect(backend);
        Ok(report)
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one display frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32, fetcher: &mut dyn TextureFetcher, backend: &mut dyn RenderBackend) {
        if !self.composed {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;
        self.notices.tick(dt);

        for event in self.input.drain() {
            self.handle_input(event);
        }

        self.pipeline.advance(dt, fetcher);

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.scene.animate_step();
            if let Some(pose) = self.intro.advance(self.timestep.dt()) {
                self.apply_intro_pose(&pose);
                if pose.just_finished {
                    self.end_intro();
                }
            }
        }

        if self.navigator.update(&self.scene, &mut self.camera, dt) {
            self.controls.set_enabled(self.intro_done);
            self.pending_events.push(ViewerEvent::tracking_stopped());
        }
        if !self.navigator.is_tracking() {
            self.controls.update(&mut self.camera);
        }

        self.twinkle = Twinkle::at(self.elapsed);
        self.scene.write_instances(&mut self.instances);
        self.collect(backend);
        self.write_frame();
    }

    /// Report the outcome of a host fetch. Returns whether the ticket was live.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<TextureImage, TextureError>,
        fetcher: &mut dyn TextureFetcher,
        backend: &mut dyn RenderBackend,
    ) -> bool {
        let live = self.pipeline.complete(ticket, outcome, fetcher);
        self.collect(backend);
        live
    }

    pub fn report_download(&mut self, ticket: FetchTicket, loaded: u64, total: u64) {
        self.pipeline.report_download(ticket, loaded, total);
        self.notices.post_all(self.pipeline.take_notices());
    }

    // -- Navigation --

    /// Track `name`. An unknown name changes nothing, not even a running intro.
    pub fn focus(&mut self, name: &str) -> Result<FocusOutcome, OrreryError> {
        if self.scene.entity_by_name(name).is_some() {
            self.end_intro();
        }
        let result = self.navigator.focus(name, &self.scene, &mut self.camera);
        if let Ok(outcome) = &result {
            self.controls.set_enabled(false);
            self.pending_events.push(ViewerEvent::focused(outcome.entity, outcome.panel));
        }
        self.notices.post_all(self.navigator.take_notices());
        result
    }

    pub fn stop_tracking(&mut self) {
        self.end_intro();
        if self.navigator.stop_tracking() {
            self.controls.set_enabled(true);
            self.pending_events.push(ViewerEvent::tracking_stopped());
        }
        self.notices.post_all(self.navigator.take_notices());
    }

    pub fn apply_preset(&mut self, preset: ViewPreset) {
        self.end_intro();
        let was_tracking = self.navigator.is_tracking();
        self.navigator.apply_preset(preset, &mut self.camera);
        self.controls.set_enabled(true);
        if was_tracking {
            self.pending_events.push(ViewerEvent::tracking_stopped());
        }
        self.pending_events.push(ViewerEvent::preset_applied(preset.index()));
        self.notices.post_all(self.navigator.take_notices());
    }

    pub fn reset_view(&mut self) {
        self.apply_preset(ViewPreset::Default);
    }

    pub fn overview(&mut self) {
        self.apply_preset(ViewPreset::Overview);
    }

    fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => self.controls.pointer_down(Vec2::new(x, y)),
            InputEvent::PointerMove { x, y } => self.controls.pointer_move(Vec2::new(x, y)),
            InputEvent::PointerUp { .. } => self.controls.pointer_up(),
            InputEvent::Wheel { delta_y } => self.controls.wheel(delta_y),
            InputEvent::Resize { width, height } => {
                self.camera.resize(width, height);
                self.controls.set_viewport_height(height);
            }
            InputEvent::Command(NavCommand::Focus(name)) => {
                if let Err(e) = self.focus(&name) {
                    log::debug!("focus command ignored: {}", e);
                }
            }
            InputEvent::Command(NavCommand::StopTracking) => self.stop_tracking(),
            InputEvent::Command(NavCommand::Preset(preset)) => self.apply_preset(preset),
        }
    }

    fn apply_intro_pose(&mut self, pose: &IntroPose) {
        self.camera.place(pose.position, Vec3::ZERO);
        self.camera.fov_degrees = pose.fov_degrees;
        self.scene.set_scene_yaw(pose.scene_yaw);
    }

    /// Finish the opening flight if it is running and hand the camera to the user.
    fn end_intro(&mut self) {
        if let Some(pose) = self.intro.finish() {
            self.apply_intro_pose(&pose);
        }
        if self.intro_done || !self.composed {
            return;
        }
        self.intro_done = true;
        if !self.navigator.is_tracking() {
            self.controls.set_enabled(true);
        }
        self.pending_events.push(ViewerEvent::intro_finished());
    }

    /// Apply resolved textures, advance progress and move notices to the board.
    fn collect(&mut self, backend: &mut dyn RenderBackend) {
        for resolved in self.pipeline.take_resolved() {
            let Some(node) = self.scene.apply_texture(resolved.request) else {
                log::debug!("Resolution for {} ignored; texture already applied", resolved.body);
                continue;
            };
            backend.set_texture(node, &resolved.image);
            self.textures.insert(node, resolved.image);
            self.pending_events.push(ViewerEvent::texture_applied(node, resolved.request));
            self.notices.post(Notice::Debug(format!("{} texture loaded or fallback created", resolved.body)));

            let update = self.progress.record_completion();
            self.notices.post(Notice::Status(format!("Loading textures: {}%", update.percent)));
            self.pending_events
                .push(ViewerEvent::progress(update.percent, update.completed, update.total));
            if update.became_ready {
                self.notices.post(Notice::Debug("All textures loaded, loading screen hidden".to_string()));
                self.notices.post(Notice::Toast("Visualization ready!".to_string()));
                self.pending_events.push(ViewerEvent::ready());
            }
        }
        self.notices.post_all(self.pipeline.take_notices());
        self.notices.post_all(self.navigator.take_notices());
    }

    fn write_frame(&mut self) {
        self.frame_counter += 1;
        let header = FrameHeader {
            frame: self.frame_counter,
            camera: self.camera.position.to_array(),
            target: self.camera.target.to_array(),
            fov_degrees: self.camera.fov_degrees,
            scene_yaw: self.scene.scene_yaw(),
            twinkle_opacity: self.twinkle.opacity,
            twinkle_size: self.twinkle.size,
            twinkle_scale: self.twinkle.scale,
            progress_percent: self.progress.percent(),
            ready: self.progress.is_ready(),
            tracking: self.navigator.target().map(|id| id.0),
        };
        self.frame_events = std::mem::take(&mut self.pending_events);
        self.frame.write(&header, &self.instances.instances, &self.frame_events);
    }

    // -- Accessors --

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn scene(&self) -> &SolarScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SolarScene {
        &mut self.scene
    }

    pub fn pipeline(&self) -> &TexturePipeline {
        &self.pipeline
    }

    pub fn progress(&self) -> &LoadProgress {
        &self.progress
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn nav_state(&self) -> NavState {
        self.navigator.state()
    }

    pub fn intro_running(&self) -> bool {
        !self.intro_done
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls.is_enabled()
    }

    pub fn texture(&self, node: EntityId) -> Option<&TextureImage> {
        self.textures.get(&node)
    }

    pub fn notice_board(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<HostNotice> {
        self.notices.drain()
    }

    /// Events of the last frame.
    pub fn events(&self) -> &[ViewerEvent] {
        &self.frame_events
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn instances(&self) -> &InstanceBuffer {
        &self.instances
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_composed(&self) -> bool {
        self.composed
    }
}
