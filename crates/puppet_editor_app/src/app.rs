// SPDX-License-Identifier: MIT OR Apache-2.0
//! Main editor application setup and event loop.

use crate::config::EditorConfig;
use crate::menus::{self, MENU_WIDTH};
use crate::panel_types::PanelType;
use crate::panels::log::TracingEvent;
use crate::panels::{ExplorerPanel, LogPanel, PlayerAction, PlayerPanel};
use crate::state::EditorState;
use crate::tasks::TaskError;
use egui_dock::{DockArea, DockState, NodeIndex, Style, TabViewer};
use egui_wgpu::wgpu;
use puppet_editor_timeline::SpriteId;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Editor application errors
#[derive(Debug, Error)]
pub enum EditorError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    /// Renderer initialization failed
    #[error("Failed to initialize renderer: {0}")]
    RendererInit(String),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Background runtime could not start
    #[error(transparent)]
    Tasks(#[from] TaskError),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Tab viewer implementation for `egui_dock`
pub struct EditorTabViewer<'a> {
    state: &'a mut EditorState,
    explorer: &'a mut ExplorerPanel,
    player: &'a mut PlayerPanel,
    log: &'a mut LogPanel,
    /// Property link clicked this frame
    player_action: Option<PlayerAction>,
    /// Sprite double-clicked this frame
    chosen_sprite: Option<SpriteId>,
}

impl<'a> TabViewer for EditorTabViewer<'a> {
    type Tab = PanelType;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        format!("{} {}", tab.icon(), tab.name()).into()
    }

    fn ui(&mut self, ui: &mut egui::Ui, tab: &mut Self::Tab) {
        match tab {
            PanelType::Explorer => {
                if let Some(id) = self.explorer.ui(ui, self.state.sprites()) {
                    self.chosen_sprite = Some(id);
                }
            }
            PanelType::Player => {
                if let Some(action) = self.player.ui(ui, self.state.playback_mut()) {
                    self.player_action = Some(action);
                }
            }
            PanelType::Log => self.log.ui(ui),
        }
    }

    fn closeable(&mut self, tab: &mut Self::Tab) -> bool {
        *tab == PanelType::Log
    }
}

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| EditorError::RendererInit(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| EditorError::RendererInit("no suitable GPU adapter".to_string()))?;

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Puppet Editor Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .map_err(|e| EditorError::RendererInit(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| EditorError::RendererInit("surface has no formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Editor Encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            // egui-wgpu renders into a 'static pass
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Editor Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: 0.1,
                                g: 0.1,
                                b: 0.1,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Running state of the editor
struct EditorRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    editor: EditorInner,
    /// Title currently shown by the window
    title: String,
}

/// Inner editor state and panels
struct EditorInner {
    state: EditorState,
    dock_state: DockState<PanelType>,
    explorer: ExplorerPanel,
    player: PlayerPanel,
    log: LogPanel,
    last_frame: Instant,
}

impl EditorInner {
    fn new(config: EditorConfig, tracing_rx: Option<mpsc::Receiver<TracingEvent>>) -> Result<Self> {
        let thumbnail_size = config.thumbnail_size;
        Ok(Self {
            state: EditorState::new(config)?,
            dock_state: Self::create_default_layout(),
            explorer: ExplorerPanel::new(thumbnail_size),
            player: PlayerPanel::new(),
            log: LogPanel::new(tracing_rx),
            last_frame: Instant::now(),
        })
    }

    fn create_default_layout() -> DockState<PanelType> {
        // Player in the center
        let mut dock_state = DockState::new(vec![PanelType::Player]);
        let surface = dock_state.main_surface_mut();

        // Explorer on the left
        let [center, _left] = surface.split_left(NodeIndex::root(), 0.35, vec![PanelType::Explorer]);

        // Log under the player
        let [_top, _bottom] = surface.split_below(center, 0.75, vec![PanelType::Log]);

        dock_state
    }

    fn update(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let delta_time = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        self.state.poll_jobs();
        self.state.advance(delta_time);

        // Side menu
        let mut menu_action = None;
        egui::SidePanel::left("menu_panel")
            .resizable(false)
            .exact_width(MENU_WIDTH)
            .show(ctx, |ui| {
                let state = &self.state;
                menu_action = menus::menu_ui(ui, |action| state.menu_enabled(action));

                let jobs = state.pending_jobs();
                if jobs > 0 {
                    ui.separator();
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.weak(format!("{jobs} running"));
                    });
                }
            });
        if let Some(action) = menu_action {
            self.state.run_menu(action);
        }

        // Main dock area
        let mut tab_viewer = EditorTabViewer {
            state: &mut self.state,
            explorer: &mut self.explorer,
            player: &mut self.player,
            log: &mut self.log,
            player_action: None,
            chosen_sprite: None,
        };

        DockArea::new(&mut self.dock_state)
            .style(Style::from_egui(ctx.style().as_ref()))
            .show(ctx, &mut tab_viewer);

        let (player_action, chosen_sprite) = (tab_viewer.player_action, tab_viewer.chosen_sprite);
        if let Some(id) = chosen_sprite {
            self.state.append_sprite(&id);
        }
        if let Some(action) = player_action {
            self.state.run_player_action(action);
        }

        // Dialogs take the keyboard while open
        let answer = self.state.dialog_mut().and_then(|dialog| dialog.show(ctx));
        if let Some(answer) = answer {
            self.state.answer(answer);
        } else if !self.state.has_dialog() {
            self.player.handle_keyboard(ctx, self.state.playback_mut());
        }

        self.state.noticer().show(ctx);
    }
}

/// Main editor application
pub struct EditorApp {
    config: EditorConfig,
    running: Option<EditorRunning>,
    /// Tracing receiver passed to the log panel on first resume.
    tracing_rx: Option<mpsc::Receiver<TracingEvent>>,
}

impl EditorApp {
    /// Create a new editor application
    pub fn new(config: EditorConfig, tracing_rx: Option<mpsc::Receiver<TracingEvent>>) -> Self {
        Self {
            config,
            running: None,
            tracing_rx,
        }
    }

    /// Run the editor until the window closes
    pub fn run(config: EditorConfig, tracing_rx: Option<mpsc::Receiver<TracingEvent>>) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = EditorApp::new(config, tracing_rx);
        event_loop.run_app(&mut app)?;

        Ok(())
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<EditorRunning> {
        tracing::info!("Creating editor window...");

        let window_config = self.config.window;
        let editor = EditorInner::new(self.config.clone(), self.tracing_rx.take())?;
        let title = editor.state.title();

        let window_attrs = Window::default_attributes()
            .with_title(title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(window_config.width, window_config.height))
            .with_min_inner_size(winit::dpi::LogicalSize::new(
                window_config.min_width,
                window_config.min_height,
            ));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        tracing::info!("Initializing graphics...");
        let graphics = GraphicsState::new(window.clone())?;

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024), // max texture side
        );

        tracing::info!("Editor initialized, window size {:?}", window.inner_size());

        Ok(EditorRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            editor,
            title,
        })
    }
}

impl ApplicationHandler for EditorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                tracing::error!("{e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let full_output = running.egui_ctx.run(raw_input, |ctx| {
                    running.editor.update(ctx);
                });

                let title = running.editor.state.title();
                if title != running.title {
                    running.window.set_title(&title);
                    running.title = title;
                }

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                match running.graphics.render(&running.egui_ctx, full_output, &running.window) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }

                running.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_has_every_panel() {
        let dock_state = EditorInner::create_default_layout();
        for panel in [PanelType::Explorer, PanelType::Player, PanelType::Log] {
            assert!(dock_state.find_tab(&panel).is_some(), "{panel:?} missing");
        }
    }
}
