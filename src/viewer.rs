//! Standalone ring window backed by winit.
//!
//! The window opens immediately; meshes load on background threads while
//! it shows nothing. Once every load has reported, the scene is composed
//! once and the render loop draws it until the window closes or the stop
//! handle fires.
//!
//! ```no_run
//! # use ringfield::Viewer;
//! Viewer::builder().build().run().unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    assets::{has_obj_files, matcap::MatcapImage, AssetLoader, PendingLoads},
    camera::input::InputHandler,
    error::RingfieldError,
    gpu::render_context::RenderContext,
    options::Options,
    render_loop::{RenderLoop, StopHandle},
    scene::{SceneComposer, SceneSession},
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    title: Option<String>,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: None,
            title: None,
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title, overriding `display.title`.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        let mut options = self.options.unwrap_or_default();
        if let Some(title) = self.title {
            options.display.title = title;
        }
        Viewer {
            options,
            stop: StopHandle::new(),
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays the rings.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    stop: StopHandle,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Handle that closes the viewer from another thread.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed or the stop handle fires.
    ///
    /// # Errors
    ///
    /// Returns [`RingfieldError::Viewer`] if the event loop fails, or the
    /// error that ended the session early (GPU setup, loader threads, an
    /// empty geometry pool).
    pub fn run(self) -> Result<(), RingfieldError> {
        let event_loop = EventLoop::new()
            .map_err(|e| RingfieldError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            context: None,
            pending: None,
            matcap: None,
            session: None,
            input: InputHandler::new(),
            render_loop: RenderLoop::with_handle(self.stop),
            options: self.options,
            error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| RingfieldError::Viewer(e.to_string()))?;

        app.error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    /// GPU context waiting for the scene; moved into the session.
    context: Option<RenderContext>,
    pending: Option<PendingLoads>,
    matcap: Option<MatcapImage>,
    session: Option<SceneSession>,
    input: InputHandler,
    render_loop: RenderLoop,
    options: Options,
    error: Option<RingfieldError>,
}

/// Compute the wgpu surface size, always the full window dimensions.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

/// Take both values the session starts from.
///
/// Either one missing is an error; the composed scene cannot be drawn.
fn take_both<A, B>(
    a: &mut Option<A>,
    b: &mut Option<B>,
) -> Result<(A, B), RingfieldError> {
    match (a.take(), b.take()) {
        (Some(a), Some(b)) => Ok((a, b)),
        (a_left, b_left) => Err(RingfieldError::Viewer(format!(
            "scene ready without {}",
            match (a_left.is_some(), b_left.is_some()) {
                (false, false) => "a GPU context or matcap",
                (false, true) => "a GPU context",
                _ => "a matcap",
            }
        ))),
    }
}

impl ViewerApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RingfieldError) {
        log::error!("{error}");
        self.error = Some(error);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.render_loop.handle().stop();
        if let Some(pending) = self.pending.take() {
            // Loader threads cannot be interrupted; let them finish.
            drop(pending.wait());
        }
        if let Some(session) = self.session.take() {
            session.teardown();
        }
        event_loop.exit();
    }

    /// Poll outstanding loads and compose the scene once they all report.
    fn try_start_session(&mut self, event_loop: &ActiveEventLoop) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let Some(pool) = pending.poll() else {
            return;
        };
        self.pending = None;

        let mut composer = SceneComposer::seeded(self.options.scene.seed);
        let scene = match composer.compose(&pool) {
            Ok(scene) => scene,
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        };

        let (context, matcap) =
            match take_both(&mut self.context, &mut self.matcap) {
                Ok(ready) => ready,
                Err(e) => {
                    self.fail(event_loop, e);
                    return;
                }
            };
        self.session =
            Some(SceneSession::init(context, &self.options, scene, &matcap));
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_none() {
            self.try_start_session(event_loop);
        }

        if let Some(session) = self.session.as_mut() {
            let mut result = Ok(());
            let running = self.render_loop.tick(|_| {
                result = session.run_frame();
            });
            if !running {
                self.shutdown(event_loop);
                return;
            }
            match result {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                    session.reconfigure();
                }
                Err(e) => {
                    log::error!("render error: {e:?}");
                }
            }
        } else if self.render_loop.handle().is_stopped() {
            self.shutdown(event_loop);
            return;
        }

        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.options.display.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, RingfieldError::Viewer(e.to_string()));
                return;
            }
        };

        let size = viewport_size(window.inner_size());
        let context =
            match pollster::block_on(RenderContext::new(window.clone(), size))
            {
                Ok(c) => c,
                Err(e) => {
                    self.fail(event_loop, e.into());
                    return;
                }
            };

        let scene_options = &self.options.scene;
        if !has_obj_files(&scene_options.asset_dir) {
            log::warn!(
                "no .obj files in {}; every ring asset will fail to load",
                scene_options.asset_dir.display()
            );
        }
        let loader = AssetLoader::new(
            scene_options.asset_dir.clone(),
            scene_options.assets.clone(),
        );
        match loader.spawn() {
            Ok(pending) => self.pending = Some(pending),
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        }
        self.matcap =
            Some(MatcapImage::load_or_fallback(&scene_options.matcap_path));

        window.request_redraw();
        self.window = Some(window);
        self.context = Some(context);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(event_size) => {
                let (vp_w, vp_h) = viewport_size(event_size);
                if let Some(session) = &mut self.session {
                    session.resize(vp_w, vp_h);
                } else if let Some(context) = &mut self.context {
                    context.resize(vp_w, vp_h);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            other => {
                if let Some(session) = &mut self.session {
                    let _ = self
                        .input
                        .handle_event(session.controls_mut(), &other);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_present_are_taken() {
        let (mut a, mut b) = (Some(1), Some("m"));
        assert_eq!(take_both(&mut a, &mut b).unwrap(), (1, "m"));
        assert!(a.is_none() && b.is_none());
    }

    #[test]
    fn missing_input_is_an_error() {
        let err = take_both(&mut None::<u8>, &mut Some("m")).unwrap_err();
        assert!(matches!(
            &err,
            RingfieldError::Viewer(msg) if msg.contains("GPU context")
        ));

        let err = take_both(&mut Some(1), &mut None::<&str>).unwrap_err();
        assert!(matches!(
            &err,
            RingfieldError::Viewer(msg) if msg.ends_with("a matcap")
        ));
    }

    #[test]
    fn viewport_is_never_zero() {
        let size = viewport_size(winit::dpi::PhysicalSize::new(0, 0));
        assert_eq!(size, (1, 1));
    }
}
