//! SDL2 window with an OpenGL 3.3 core context.
//!
//! SDL events are translated into [`WindowEvent`]s so the viewer never sees
//! SDL types.

use std::time::Instant;

use log::info;
use sdl2::event::{Event, WindowEvent as SdlWindowEvent};
use sdl2::keyboard::{Keycode, Mod};
use sdl2::mouse::MouseButton;
use sdl2::video::{GLContext, GLProfile};

use crate::camera::Modifiers;
use crate::config::WindowConfig;
use crate::error::ViewerError;
use crate::input::WindowEvent;
use crate::viewer::FrameInput;

pub struct Window {
    // Declared before the context so it is dropped first.
    gl: glow::Context,
    _gl_context: GLContext,
    window: sdl2::video::Window,
    event_pump: sdl2::EventPump,
    sdl: sdl2::Sdl,
    start: Instant,
}

/// Window behavior derived from the config and the run mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WindowMode {
    resizable: bool,
    swap_interval: i32,
}

impl WindowMode {
    // Offline frames are read back from the default framebuffer, whose
    // contents are undefined for pixels the window system does not show, so
    // the offline window stays visible at a fixed size.
    fn new(config: &WindowConfig, offline: bool) -> Self {
        Self {
            resizable: !offline,
            swap_interval: if config.vsync && !offline { 1 } else { 0 },
        }
    }
}

fn init_error(what: &str, err: impl std::fmt::Display) -> ViewerError {
    ViewerError::Initialization(format!("{what}: {err}"))
}

impl Window {
    /// Opens the window and makes its context current. An `offline` window
    /// is shown but cannot be resized, and does not wait for vsync.
    pub fn new(config: &WindowConfig, offline: bool) -> Result<Self, ViewerError> {
        let mode = WindowMode::new(config, offline);
        let sdl = sdl2::init().map_err(|e| init_error("failed to init SDL2", e))?;
        let video = sdl
            .video()
            .map_err(|e| init_error("failed to init SDL2 video", e))?;

        {
            let gl_attr = video.gl_attr();
            gl_attr.set_context_profile(GLProfile::Core);
            gl_attr.set_context_version(3, 3);
            gl_attr.set_depth_size(24);
            gl_attr.set_double_buffer(true);
        }

        let mut builder = video.window(&config.title, config.width, config.height);
        builder.opengl().position_centered();
        if mode.resizable {
            builder.resizable();
        }
        let window = builder
            .build()
            .map_err(|e| init_error("failed to create window", e))?;

        let gl_context = window
            .gl_create_context()
            .map_err(|e| init_error("failed to create OpenGL context", e))?;
        window
            .gl_make_current(&gl_context)
            .map_err(|e| init_error("failed to make OpenGL context current", e))?;

        if let Err(err) = video.gl_set_swap_interval(mode.swap_interval) {
            log::warn!("could not set swap interval: {err}");
        }

        // SAFETY: the context created above is current on this thread.
        let gl = unsafe {
            glow::Context::from_loader_function(|name| video.gl_get_proc_address(name) as *const _)
        };
        let (version, glsl) = crate::gpu::describe_context(&gl);
        info!("OpenGL version: {version}");
        info!("GLSL version: {glsl}");

        video.text_input().start();
        let event_pump = sdl
            .event_pump()
            .map_err(|e| init_error("failed to get SDL event pump", e))?;

        Ok(Self {
            gl,
            _gl_context: gl_context,
            window,
            event_pump,
            sdl,
            start: Instant::now(),
        })
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn gl_mut(&mut self) -> &mut glow::Context {
        &mut self.gl
    }

    /// Drawable size in pixels and seconds since the window opened.
    pub fn frame_input(&self) -> FrameInput {
        let (width, height) = self.window.drawable_size();
        FrameInput {
            width,
            height,
            time: self.start.elapsed().as_secs_f32(),
        }
    }

    pub fn swap(&self) {
        self.window.gl_swap_window();
    }

    /// Drains pending SDL events.
    pub fn poll_events(&mut self) -> Vec<WindowEvent> {
        let modifiers = current_modifiers(self.sdl.keyboard().mod_state());
        let mut events = Vec::new();
        for event in self.event_pump.poll_iter() {
            let translated = match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => Some(WindowEvent::Quit),
                Event::TextInput { text, .. } => {
                    events.extend(text.chars().map(WindowEvent::Char));
                    None
                }
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => Some(WindowEvent::MousePressed {
                    x: x as f32,
                    y: y as f32,
                    modifiers,
                }),
                Event::MouseMotion {
                    mousestate, x, y, ..
                } if mousestate.left() => Some(WindowEvent::MouseDragged {
                    x: x as f32,
                    y: y as f32,
                }),
                Event::Window {
                    win_event: SdlWindowEvent::SizeChanged(w, h),
                    ..
                } => Some(WindowEvent::Resized {
                    width: w.max(0) as u32,
                    height: h.max(0) as u32,
                }),
                _ => None,
            };
            events.extend(translated);
        }
        events
    }
}

fn current_modifiers(state: Mod) -> Modifiers {
    Modifiers {
        shift: state.intersects(Mod::LSHIFTMOD | Mod::RSHIFTMOD),
        ctrl: state.intersects(Mod::LCTRLMOD | Mod::RCTRLMOD),
    }
}
