//! Desktop host for the almond eye.
//!
//! `cargo run --example desktop [config.json]`. Escape quits; the side
//! panel toggles the theme and edits the live palette.

use std::sync::Arc;

use almond_eye::gui::{eye_control_panel, EyeReadout};
use almond_eye::{
    EyeConfig, EyeController, EyeRenderer, InteractionEvent, SystemClock, ThemeVariables,
    Viewport,
};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

type Eye = EyeController<EyeRenderer, Box<dyn FnMut()>, SystemClock>;

/// Window surface plus the device that draws into it.
struct Gpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

impl Gpu {
    async fn new(window: Arc<Window>) -> Self {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .expect("window surface");
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .expect("no compatible GPU adapter");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .expect("GPU device");

        let size = window.inner_size();
        let config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .expect("surface not supported by adapter");
        surface.configure(&device, &config);

        Self {
            device,
            queue,
            surface,
            config,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    fn frame(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                None
            }
            Err(e) => {
                log::error!("surface error: {e:?}");
                None
            }
        }
    }
}

/// egui side panel drawn on top of the eye.
struct Overlay {
    ctx: egui::Context,
    input: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Overlay {
    fn new(window: &Window, gpu: &Gpu) -> Self {
        let ctx = egui::Context::default();
        let input = egui_winit::State::new(
            ctx.clone(),
            ctx.viewport_id(),
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);
        Self {
            ctx,
            input,
            renderer,
        }
    }

    /// Run the panel and paint it over whatever `view` already holds.
    fn paint(
        &mut self,
        window: &Window,
        gpu: &Gpu,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        ui: impl FnMut(&egui::Context),
    ) {
        let raw_input = self.input.take_egui_input(window);
        let output = self.ctx.run(raw_input, ui);
        self.input
            .handle_platform_output(window, output.platform_output);

        let jobs = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        for (id, delta) in &output.textures_delta.set {
            self.renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        self.renderer
            .update_buffers(&gpu.device, &gpu.queue, encoder, &jobs, &screen);

        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("panel"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            self.renderer
                .render(&mut pass.forget_lifetime(), &jobs, &screen);
        }

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

struct Running {
    window: Arc<Window>,
    gpu: Gpu,
    overlay: Overlay,
    eye: Eye,
    theme: ThemeVariables,
}

impl Running {
    fn redraw(&mut self) {
        // Advances the animation and schedules the next redraw.
        self.eye.on_frame();

        let Some(frame) = self.gpu.frame() else {
            return;
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        if let Some(renderer) = self.eye.surface() {
            renderer.render(&mut encoder, &view, &self.gpu.queue);
        }

        let readout = EyeReadout::from_controller(&self.eye);
        let (eye, theme) = (&mut self.eye, &mut self.theme);
        let mut theme_changed = false;
        self.overlay
            .paint(&self.window, &self.gpu, &mut encoder, &view, |ctx| {
                if let Some(palette) = eye.palette_mut() {
                    theme_changed |=
                        eye_control_panel(ctx, palette, theme, readout.as_ref()).theme_changed;
                }
            });
        if theme_changed {
            self.eye.refresh_theme(&self.theme);
        }

        self.gpu.queue.submit([encoder.finish()]);
        frame.present();
    }
}

fn viewport_of(window: &Window) -> Viewport {
    let scale = window.scale_factor();
    let size = window.inner_size().to_logical::<f32>(scale);
    Viewport::new(size.width, size.height, scale as f32)
}

/// Window events that count as user interaction.
fn interaction(event: &WindowEvent, scale: f64) -> Option<InteractionEvent> {
    match event {
        WindowEvent::CursorMoved { position, .. } => {
            let p = position.to_logical::<f32>(scale);
            Some(InteractionEvent::PointerMove { x: p.x, y: p.y })
        }
        WindowEvent::MouseInput {
            state: ElementState::Pressed,
            ..
        } => Some(InteractionEvent::PointerDown),
        WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
            Some(InteractionEvent::KeyDown)
        }
        WindowEvent::Touch(touch) if touch.phase == TouchPhase::Started => {
            Some(InteractionEvent::TouchStart)
        }
        WindowEvent::MouseWheel { .. } => Some(InteractionEvent::Scroll),
        _ => None,
    }
}

struct App {
    config: EyeConfig,
    running: Option<Running>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Almond Eye")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("cannot open window: {e}");
                event_loop.exit();
                return;
            }
        };

        let gpu = pollster::block_on(Gpu::new(window.clone()));
        let overlay = Overlay::new(&window, &gpu);

        let redraw = window.clone();
        let mut eye = EyeController::new(
            Some(EyeRenderer::new(&gpu.device, gpu.config.format)),
            Box::new(move || redraw.request_redraw()) as Box<dyn FnMut()>,
            SystemClock,
            viewport_of(&window),
            &self.config.theme,
            self.config.tuning.clone(),
        );
        eye.start();

        self.running = Some(Running {
            window,
            gpu,
            overlay,
            eye,
            theme: self.config.theme.clone(),
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = &mut self.running else {
            return;
        };

        if app
            .overlay
            .input
            .on_window_event(&app.window, &event)
            .consumed
        {
            return;
        }

        if let Some(input) = interaction(&event, app.window.scale_factor()) {
            app.eye.handle_event(input);
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                app.eye.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app.gpu.resize(size.width, size.height);
                app.eye.resize(viewport_of(&app.window));
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                app.eye.resize(viewport_of(&app.window));
            }
            WindowEvent::Occluded(hidden) => app.eye.set_visible(!hidden),
            WindowEvent::RedrawRequested => app.redraw(),
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => EyeConfig::load(&path).unwrap_or_else(|e| {
            log::warn!("{path}: {e}, using defaults");
            EyeConfig::default()
        }),
        None => EyeConfig::default(),
    };

    let event_loop = EventLoop::new().expect("event loop");
    let mut app = App {
        config,
        running: None,
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("event loop exited: {e}");
    }
}
