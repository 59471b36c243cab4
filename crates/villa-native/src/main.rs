use std::time::{Duration, Instant};

use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use villa_core::render::{surface_config, ScenePass};
use villa_core::{
    presets, BackdropFade, Camera, DeltaMode, Director, InputEvent, PhaseId, ProgressSource,
    SceneUniforms, ScrollHost, SequenceEvent,
};

const MAX_FRAME_DT: Duration = Duration::from_millis(100);
const MOUSE_POINTER_ID: i32 = 0;

/// There is no page to scroll on the desktop: lock and scroll requests are
/// logged and the window counts as settled straight away.
#[derive(Default)]
struct WindowHost {
    locked: bool,
}

impl ScrollHost for WindowHost {
    fn is_available(&self) -> bool {
        true
    }

    fn set_page_scroll_locked(&mut self, locked: bool) {
        if locked != self.locked {
            log::info!("[host] scroll {}", if locked { "locked" } else { "unlocked" });
            self.locked = locked;
        }
    }

    fn scroll_to_anchor(&mut self, anchor: &str) {
        log::info!("[host] scroll to {}", anchor);
    }
}

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    scene: ScenePass,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let config = surface_config(&surface_caps, size.width, size.height)
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        surface.configure(&device, &config);
        let scene = ScenePass::new(&device, config.format);

        let (width, height) = (config.width, config.height);
        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            scene,
            width,
            height,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    fn render(&mut self, uniforms: &SceneUniforms) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.scene.draw(&self.device, &self.queue, &view, uniforms);
        frame.present();
        Ok(())
    }
}

fn mount_tour() -> Director {
    let mut director = Director::new(Box::new(WindowHost::default()));
    // A window has no page to scroll, so every section is wheel-driven.
    for config in presets::tour() {
        let config = match config.source {
            ProgressSource::ScrollLinked { .. } => config.with_source(ProgressSource::Captured),
            ProgressSource::Captured => config,
        };
        let name = config.name;
        if let Err(e) = director.mount(config) {
            log::error!("[seq] {} rejected: {}", name, e);
        }
    }
    director
}

/// Sequencer state driven by the window's event loop.
struct Tour {
    director: Director,
    backdrop: BackdropFade,
    events: Vec<SequenceEvent>,
    last_frame: Instant,
    elapsed: f32,
    cursor_y: f32,
    mouse_down: bool,
}

impl Tour {
    fn new() -> Self {
        Self {
            director: mount_tour(),
            backdrop: BackdropFade::default(),
            events: Vec::new(),
            last_frame: Instant::now(),
            elapsed: 0.0,
            cursor_y: 0.0,
            mouse_down: false,
        }
    }

    fn input(&mut self, event: &WindowEvent) {
        let ev = match *event {
            WindowEvent::MouseWheel { delta, .. } => match delta {
                // winit reports scrolling away from the user as positive, the DOM the opposite
                MouseScrollDelta::LineDelta(_, y) => InputEvent::Wheel {
                    delta_y: -y,
                    mode: DeltaMode::Line,
                },
                MouseScrollDelta::PixelDelta(pos) => InputEvent::Wheel {
                    delta_y: -pos.y as f32,
                    mode: DeltaMode::Pixel,
                },
            },
            WindowEvent::Touch(Touch {
                phase, location, id, ..
            }) => {
                let id = id as i32;
                let client_y = location.y as f32;
                match phase {
                    TouchPhase::Started => InputEvent::TouchStart { id, client_y },
                    TouchPhase::Moved => InputEvent::TouchMove { id, client_y },
                    TouchPhase::Ended | TouchPhase::Cancelled => InputEvent::TouchEnd { id },
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_y = position.y as f32;
                if !self.mouse_down {
                    return;
                }
                InputEvent::PointerMove {
                    id: MOUSE_POINTER_ID,
                    client_y: self.cursor_y,
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.mouse_down = state == ElementState::Pressed;
                if self.mouse_down {
                    InputEvent::PointerDown {
                        id: MOUSE_POINTER_ID,
                        client_y: self.cursor_y,
                    }
                } else {
                    InputEvent::PointerUp {
                        id: MOUSE_POINTER_ID,
                    }
                }
            }
            _ => return,
        };
        self.director.dispatch_to_owner(&ev);
    }

    /// Start the tour over from the hero.
    fn restart(&mut self, page_height: f32) {
        self.director = mount_tour();
        self.director.set_page_height(page_height);
        self.backdrop = BackdropFade::default();
        log::info!("[seq] tour restarted");
    }

    fn frame(&mut self, gpu: &mut GpuState) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt = (now - self.last_frame).min(MAX_FRAME_DT);
        self.last_frame = now;
        self.elapsed += dt.as_secs_f32();

        self.events.clear();
        self.director.tick(dt, &mut self.events);
        for ev in &self.events {
            log::info!("[seq] {:?}", ev);
        }

        let Some((index, snap)) = self.director.focus() else {
            return Ok(());
        };
        let backdrop_phase = if index == 0 { snap.phase } else { PhaseId(1) };
        let backdrop = self.backdrop.tick(dt, backdrop_phase);
        let phase_count = self
            .director
            .sequence(snap.id)
            .map_or(1, |s| s.config().phase_bands.len());
        let camera = Camera::new(snap.camera, gpu.aspect());
        gpu.render(&SceneUniforms::new(
            &camera,
            snap,
            phase_count,
            backdrop,
            self.elapsed,
        ))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Villa tour (native)")
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(&window))?;
    let mut tour = Tour::new();
    tour.director.set_page_height(state.height as f32);

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => {
                state.resize(size);
                tour.director.set_page_height(size.height as f32);
            }
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Escape) => elwt.exit(),
                Key::Character(c) if c.eq_ignore_ascii_case("r") => tour.restart(state.height as f32),
                _ => {}
            },
            other => tour.input(&other),
        },
        Event::AboutToWait => match tour.frame(&mut state) {
            Ok(_) => state.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
            Err(_) => {}
        },
        _ => {}
    })?;
    Ok(())
}
