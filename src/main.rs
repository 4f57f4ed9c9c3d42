//! Galaxy Drift - a spiral galaxy that pulses to music
//!
//! Hundreds of thousands of particles swirl around the core while a lone
//! spacecraft drifts past, lit by its own light and a beam from the center.

use clap::Parser;
use glam::Vec3;
use std::path::Path;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use galaxydrift::assets::{load_gltf, load_texture, AssetHandle, ModelData, TextureData};
use galaxydrift::audio::{AudioSampler, PlaybackControls, PlaybackSystem, SilentSampler};
use galaxydrift::camera::OrbitCamera;
use galaxydrift::cli::Args;
use galaxydrift::galaxy::GalaxySystem;
use galaxydrift::params::*;
use galaxydrift::rendering::{flare_placement, RenderSystem};
use galaxydrift::scene::{SceneSystem, SpacecraftSlot};
use galaxydrift::uniforms::{CameraUniforms, FrameClock};

const TITLE: &str = "Galaxy Drift";

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    scale_factor: f64,

    // Simulation systems
    galaxy: GalaxySystem,
    scene: SceneSystem,
    camera: OrbitCamera,

    // Audio
    playback: Option<PlaybackSystem>,
    silence: SilentSampler,
    controls: PlaybackControls,

    // Background loads
    model: AssetHandle<ModelData>,
    baked_texture: AssetHandle<TextureData>,
    flare_texture: AssetHandle<TextureData>,

    // Input
    panel: TuningPanel,
    shift_held: bool,

    // Configuration
    render_config: RenderConfig,

    // Time tracking
    clock: FrameClock,
}

impl App {
    fn new(args: &Args) -> Self {
        let galaxy = GalaxySystem::new(args.galaxy_parameters(), args.seed);
        let scene = SceneSystem::new(
            SpacecraftPlacement::default(),
            DriftGroup::default(),
            LightRig::default(),
        );
        let camera = OrbitCamera::new(&CameraRig::default());

        let AssetPaths {
            model: model_path,
            baked_texture: texture_path,
            flare_texture: flare_path,
        } = args.asset_paths();
        let model = AssetHandle::spawn("spacecraft model", move || load_gltf(model_path));
        let baked_texture =
            AssetHandle::spawn("spacecraft texture", move || load_texture(texture_path));
        let flare_texture = AssetHandle::spawn("lens flare", move || load_texture(flare_path));

        let playback = args.audio.as_deref().and_then(|path| {
            match PlaybackSystem::open(Path::new(path), AnalyserConfig::default()) {
                Ok(playback) => Some(playback),
                Err(e) => {
                    log::warn!("Audio unavailable, running silent: {}", e);
                    None
                }
            }
        });

        let mut app = Self {
            window: None,
            render_system: None,
            scale_factor: 1.0,
            galaxy,
            scene,
            camera,
            playback,
            silence: SilentSampler,
            controls: PlaybackControls::default(),
            model,
            baked_texture,
            flare_texture,
            panel: TuningPanel::new(),
            shift_held: false,
            render_config: RenderConfig::default(),
            clock: FrameClock::new(),
        };

        if args.autoplay {
            app.toggle_playback();
        }
        app
    }

    /// Audio source for this frame
    fn sampler(&mut self) -> &mut dyn AudioSampler {
        match self.playback.as_mut() {
            Some(playback) => playback as &mut dyn AudioSampler,
            None => &mut self.silence,
        }
    }

    fn toggle_playback(&mut self) {
        let action = self.controls.press();
        match &self.playback {
            Some(playback) => playback.apply(action),
            None => log::info!("No audio track loaded"),
        }
        log::info!("Playback button now reads '{}'", self.controls.label());
        self.refresh_title();
    }

    /// Run `edit` against everything the tuning panel binds to
    fn with_tunables<R>(&mut self, edit: impl FnOnce(&mut Tunables<'_>) -> R) -> R {
        let before = self.camera.position().to_array();
        let mut eye = before;
        let (placement, lights) = self.scene.tunables_mut();
        let result = edit(&mut Tunables {
            galaxy: self.galaxy.params_mut(),
            lights,
            placement,
            camera: &mut eye,
        });

        if eye != before {
            self.camera.set_position(Vec3::from_array(eye));
        }
        result
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.scale_factor = window.scale_factor();
        let size = window.inner_size();
        self.render_config.window_width = size.width.max(1);
        self.render_config.window_height = size.height.max(1);

        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.galaxy.buffer(),
            self.galaxy.generation(),
            self.render_config.point_size(self.scale_factor),
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        log::info!("Galaxy Drift is running");
        log::info!("Space: play/pause  Tab: tuning panel  Esc: quit");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.refresh_title();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
                if size.width > 0 && size.height > 0 {
                    self.render_config.window_width = size.width;
                    self.render_config.window_height = size.height;
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                // Takes effect on the next galaxy regeneration
                self.scale_factor = scale_factor;
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_held = modifiers.state().shift_key();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

impl App {
    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        let direction = if self.shift_held { -1.0 } else { 1.0 };
        let step_scale = if self.shift_held { 10 } else { 1 };

        let commit = match code {
            KeyCode::Escape => {
                event_loop.exit();
                return;
            }
            KeyCode::Space => {
                self.toggle_playback();
                return;
            }
            KeyCode::Tab => {
                self.panel.toggle_visibility();
                self.refresh_title();
                return;
            }
            KeyCode::ArrowUp if self.panel.is_visible() => {
                self.panel.select_previous();
                self.refresh_title();
                return;
            }
            KeyCode::ArrowDown if self.panel.is_visible() => {
                self.panel.select_next();
                self.refresh_title();
                return;
            }
            KeyCode::ArrowLeft if self.panel.is_visible() => {
                let panel = self.panel;
                self.with_tunables(|tunables| panel.step_selected(-step_scale, tunables))
            }
            KeyCode::ArrowRight if self.panel.is_visible() => {
                let panel = self.panel;
                self.with_tunables(|tunables| panel.step_selected(step_scale, tunables))
            }
            KeyCode::KeyI => {
                let color = self.galaxy.params().inside_color.rotate_hue(30.0 * direction);
                let galaxy = self.galaxy.params_mut();
                TuningPanel::commit_color(TuningField::InsideColor, color, galaxy)
            }
            KeyCode::KeyO => {
                let color = self.galaxy.params().outside_color.rotate_hue(30.0 * direction);
                let galaxy = self.galaxy.params_mut();
                TuningPanel::commit_color(TuningField::OutsideColor, color, galaxy)
            }
            _ => return,
        };

        self.apply_commit(commit);
        self.refresh_title();
    }

    fn apply_commit(&mut self, commit: Commit) {
        match commit {
            Commit::Unchanged => {}
            Commit::UpdateLights => {
                log::debug!("Spot light intensity {}", self.scene.lights().spot_intensity);
            }
            // Placement is read every frame; the eye already moved in with_tunables
            Commit::UpdateSpacecraft => {
                log::debug!("Spacecraft moved");
            }
            Commit::UpdateCamera => {
                log::debug!("Camera moved to {:?}", self.camera.position());
            }
            Commit::RegenerateGalaxy => {
                // GPU copy of the retired buffer is released on the next frame's install
                let retired = self.galaxy.regenerate();
                log::debug!("Retired {} particles", retired.len());
            }
        }
    }

    /// Window title: playing indicator, plus the tuning panel while it is open
    fn refresh_title(&mut self) {
        let mut title = if self.controls.is_playing() {
            format!("\u{25b6} {}", TITLE)
        } else {
            TITLE.to_string()
        };
        if self.panel.is_visible() {
            let field = self.panel.selected();
            let line = self.with_tunables(|tunables| TuningPanel::describe(field, tunables));
            title = format!("{} | {}", title, line);
        }

        if let Some(window) = &self.window {
            window.set_title(&title);
        }
    }

    /// Install whatever background loads have finished
    fn poll_assets(&mut self) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        match self.model.take() {
            Some(Ok(model)) => {
                render_system.install_spacecraft(&model);
                self.scene.spacecraft = SpacecraftSlot::Loaded {
                    triangles: model.triangle_count(),
                };
            }
            Some(Err(_)) => self.scene.spacecraft = SpacecraftSlot::Unavailable,
            None => {}
        }

        if let Some(Ok(texture)) = self.baked_texture.take() {
            render_system.set_spacecraft_texture(&texture);
        }
        if let Some(Ok(texture)) = self.flare_texture.take() {
            render_system.set_flare_texture(&texture);
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        if self.render_system.is_none() {
            return;
        }

        self.poll_assets();

        let frame = self.clock.tick();
        self.camera.update(frame.delta_s);
        self.scene.update(frame.elapsed_s);
        let bins = self.sampler().sample_frequency_bins();

        let (view_proj, _eye) = self.camera.view_proj(&self.render_config);
        let light_position = self.scene.point_light_position();
        let spacecraft_transform = self.scene.spacecraft_transform();
        let lights = self.scene.light_uniforms();
        let flare_size_px = self.scene.lights().flare_size_px;

        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        if render_system.galaxy_generation() != Some(self.galaxy.generation()) {
            render_system.install_galaxy(
                self.galaxy.buffer(),
                self.galaxy.generation(),
                self.render_config.point_size(self.scale_factor),
            );
        }

        let (width, height) = render_system.size();
        render_system.update_camera(&CameraUniforms::new(view_proj, width, height));
        render_system.update_galaxy(frame.elapsed_s, bins);
        render_system.update_spacecraft(spacecraft_transform, &lights);
        render_system.update_flare(flare_placement(
            view_proj,
            light_position,
            flare_size_px,
            [width as f32, height as f32],
        ));

        match render_system.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    log::info!("Galaxy Drift - audio-reactive spiral galaxy");

    let mut app = App::new(&args);
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
