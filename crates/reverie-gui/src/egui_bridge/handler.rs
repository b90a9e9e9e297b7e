//! Baseview [`WindowHandler`] that runs the egui frame loop.
//!
//! Each `on_frame()`: build the pass input, run the caller's update closure,
//! tessellate, paint through `egui_glow`, swap buffers. If the window came up
//! without a usable GL context the pass still runs (so the update closure
//! keeps draining its queues) but nothing is painted.

use std::sync::Arc;

use baseview::gl::{GlConfig, GlContext};
use baseview::{
    Event, EventStatus, Size, Window, WindowHandler, WindowOpenOptions, WindowScalePolicy,
};
use egui::Context;
use raw_window_handle::HasRawWindowHandle;

use super::input::InputState;

/// Background behind the egui panel.
const CLEAR_COLOR: [f32; 4] = [0.08, 0.09, 0.11, 1.0];

/// Open an egui child window inside a host-provided parent.
///
/// `build` runs once with the fresh context (theme, fonts); `update` runs
/// every frame. Dropping the returned handle closes the window.
#[allow(clippy::too_many_arguments)]
pub fn open_parented<P, S>(
    parent: &P,
    title: String,
    width: u32,
    height: u32,
    scale: f64,
    state: S,
    build: impl FnOnce(&Context, &mut S) + Send + 'static,
    update: impl FnMut(&Context, &mut S) + Send + 'static,
) -> baseview::WindowHandle
where
    P: HasRawWindowHandle,
    S: Send + 'static,
{
    let options = WindowOpenOptions {
        title,
        size: Size::new(f64::from(width), f64::from(height)),
        scale: WindowScalePolicy::ScaleFactor(scale),
        gl_config: Some(GlConfig {
            version: (3, 2),
            ..GlConfig::default()
        }),
    };

    let physical = (
        (f64::from(width) * scale) as u32,
        (f64::from(height) * scale) as u32,
    );

    baseview::Window::open_parented(parent, options, move |window: &mut Window<'_>| {
        let gl = window.gl_context().and_then(GlState::new);
        if gl.is_none() {
            tracing::error!("editor has no usable OpenGL context");
        }

        let mut handler = EguiBridgeHandler {
            ctx: Context::default(),
            gl,
            input: InputState::new(scale, physical),
            state,
            update: Box::new(update),
        };
        build(&handler.ctx, &mut handler.state);
        handler
    })
}

/// OpenGL function table and the egui renderer built on it.
struct GlState {
    gl: Arc<glow::Context>,
    painter: egui_glow::Painter,
}

impl GlState {
    fn new(context: &GlContext) -> Option<Self> {
        #[allow(unsafe_code)]
        // SAFETY: the loader only resolves symbols from the window's own GL
        // context, which lives as long as the window and therefore the handler.
        let gl = unsafe {
            Arc::new(glow::Context::from_loader_function(|s| {
                context.get_proc_address(s)
            }))
        };

        match egui_glow::Painter::new(Arc::clone(&gl), "", None, false) {
            Ok(painter) => Some(Self { gl, painter }),
            Err(err) => {
                tracing::error!(error = %err, "failed to create egui painter");
                None
            }
        }
    }
}

/// Window handler driving one editor.
struct EguiBridgeHandler<S> {
    ctx: Context,
    gl: Option<GlState>,
    input: InputState,
    state: S,
    #[allow(clippy::type_complexity)]
    update: Box<dyn FnMut(&Context, &mut S) + Send>,
}

impl<S: Send + 'static> WindowHandler for EguiBridgeHandler<S> {
    fn on_frame(&mut self, window: &mut Window<'_>) {
        let output = self
            .ctx
            .run(self.input.take(), |ctx| (self.update)(ctx, &mut self.state));

        let (Some(gl), Some(context)) = (self.gl.as_mut(), window.gl_context()) else {
            return;
        };

        #[allow(unsafe_code)]
        // SAFETY: baseview calls on_frame on the window's own thread, the one
        // the context belongs to.
        unsafe {
            context.make_current();
        }

        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        let (width, height) = self.input.physical_size();

        #[allow(unsafe_code)]
        // SAFETY: plain state calls on the current context.
        unsafe {
            use glow::HasContext;
            let [r, g, b, a] = CLEAR_COLOR;
            gl.gl.viewport(0, 0, width as i32, height as i32);
            gl.gl.clear_color(r, g, b, a);
            gl.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        gl.painter.paint_and_update_textures(
            [width, height],
            output.pixels_per_point,
            &primitives,
            &output.textures_delta,
        );

        context.swap_buffers();
    }

    fn on_event(&mut self, _window: &mut Window<'_>, event: Event) -> EventStatus {
        match event {
            Event::Mouse(mouse) => {
                self.input.mouse(&mouse);
                if self.ctx.wants_pointer_input() {
                    EventStatus::Captured
                } else {
                    EventStatus::Ignored
                }
            }
            Event::Keyboard(key) => {
                self.input.set_modifiers(key.modifiers);
                EventStatus::Ignored
            }
            Event::Window(window) => {
                self.input.window(&window);
                EventStatus::Captured
            }
        }
    }
}

impl<S> Drop for EguiBridgeHandler<S> {
    fn drop(&mut self) {
        if let Some(gl) = &mut self.gl {
            gl.painter.destroy();
        }
    }
}
