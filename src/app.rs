//! Application shell
//!
//! Owns the window, the render engine, the UI, and the scene as one explicit
//! context, and drives the render loop off winit's redraw events. Each cycle
//! runs in a fixed order: schedule the next frame, sample the clock, update
//! the orbit controller, apply the time-driven animations, draw.

use std::cell::Cell;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::{
    assets::{AssetLibrary, AssetPaths},
    clock::Clock,
    gfx::{
        camera::{CameraRig, OrbitCamera, OrbitController},
        geometry::StarDensity,
        rendering::render_engine::RenderEngine,
        scene::Scene,
    },
    scenery::{self, animation},
    ui::{panel, UiManager},
};

pub struct FlagstaffApp {
    event_loop: Option<EventLoop<()>>,
    state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui: Option<UiManager>,
    scene: Scene,
    clock: Clock,
    /// Loading indicator visibility; cleared by the asset loader's
    /// completion callback.
    loading: bool,
    asset_paths: AssetPaths,
    density: StarDensity,
}

impl FlagstaffApp {
    /// Creates the application with the given asset locations and star
    /// density. The scene itself is composed once the window exists.
    pub fn new(asset_paths: AssetPaths, density: StarDensity) -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        // Placeholder rig until the real scene is built in `resumed`
        let camera = OrbitCamera::new(125.0_f32.sqrt(), 0.46, 0.0, cgmath::Vector3::new(0.0, 0.0, 0.0), 1.0);
        let controller = OrbitController::new(0.005, 0.1);
        let scene = Scene::new(CameraRig::new(camera, controller));

        Self {
            event_loop: Some(event_loop),
            state: AppState {
                window: None,
                render_engine: None,
                ui: None,
                scene,
                clock: Clock::start(),
                loading: true,
                asset_paths,
                density,
            },
        }
    }

    /// Runs the application (consumes self and starts the event loop).
    pub fn run(mut self) {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.state)
            .expect("Failed to run event loop");
    }
}

impl AppState {
    /// One render cycle.
    ///
    /// `schedule_next` is false for the immediate re-render after a resize,
    /// which must not feed the redraw chain.
    fn draw_frame(&mut self, event_loop: &ActiveEventLoop, schedule_next: bool) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        if schedule_next {
            window.request_redraw();
        }

        let elapsed = self.clock.elapsed_seconds();

        // Orbit controller consumes accumulated input, then the camera
        // matrices refresh
        self.scene.update();

        animation::advance(&mut self.scene, elapsed);

        // Slider edits land on the scene here, before uniforms are written
        if let Some(ui) = self.ui.as_mut() {
            let loading = self.loading;
            let scene = &mut self.scene;
            ui.update_logic(&window, |frame| {
                panel::tuning_panel(frame, scene);
                if loading {
                    panel::loading_overlay(frame);
                }
            });
        }

        render_engine.update(&self.scene);

        let result = match self.ui.as_mut() {
            Some(ui) => render_engine.render_frame(
                &self.scene,
                Some(
                    |device: &wgpu::Device,
                     queue: &wgpu::Queue,
                     encoder: &mut wgpu::CommandEncoder,
                     view: &wgpu::TextureView| {
                        ui.render_display_only(device, queue, encoder, view);
                    },
                ),
            ),
            None => render_engine.render_frame_simple(&self.scene),
        };

        if let Err(err) = result {
            log::error!("draw call failed: {err}; halting render loop");
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title("flagstaff")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) else {
            return;
        };

        let window_handle = Arc::new(window);
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();

        let loaded = Cell::new(false);
        let assets = pollster::block_on(AssetLibrary::load_all(&self.asset_paths, || {
            loaded.set(true)
        }));
        self.loading = !loaded.get();

        self.scene = scenery::build_scene(&assets, self.density, width, height);

        let window_clone = window_handle.clone();
        let shadow_map_size = self.scene.sun.shadow_map_size;
        let mut renderer = pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height, shadow_map_size).await
        });

        self.scene
            .init_gpu_resources(renderer.device(), renderer.queue());
        renderer.upload_starfield(&self.scene, &assets.star_mask);

        let ui = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
        );

        self.ui = Some(ui);
        self.render_engine = Some(renderer);

        log::info!("scene ready, {} objects", self.scene.object_count());
        window_handle.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI gets first refusal on input
        if let Some(ui) = self.ui.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if matches!(
                    key_event.physical_key,
                    winit::keyboard::PhysicalKey::Code(winit::keyboard::KeyCode::Escape)
                ) {
                    event_loop.exit();
                    return;
                }
                self.scene.camera_rig.process_key_event(&key_event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if width == 0 || height == 0 {
                    return;
                }
                self.scene.camera_rig.camera.resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                // Re-render immediately so no frame shows a stale aspect
                self.draw_frame(event_loop, false);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.draw_frame(event_loop, true);
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        // Don't orbit while the pointer is on the panel
        if let Some(ui) = self.ui.as_ref() {
            if ui.wants_input() {
                return;
            }
        }

        self.scene.camera_rig.process_device_event(&event);
    }
}
