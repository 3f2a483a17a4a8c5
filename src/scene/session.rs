//! Explicit per-session rendering state.
//!
//! A [`SceneSession`] owns everything that lives between scene composition
//! and shutdown: the GPU context, depth target, renderer, orbit controls and
//! the composed scene itself. The scene is read-only after
//! [`SceneSession::init`]; frames and resizes only touch the camera and the
//! surface.

use crate::{
    assets::matcap::MatcapImage,
    camera::orbit::OrbitControls,
    gpu::{
        render_context::RenderContext,
        texture::{DepthTarget, MsaaTarget},
    },
    options::Options,
    renderer::matcap::MatcapRenderer,
    scene::ComposedScene,
};

/// GPU, camera and scene state for one viewing session.
pub struct SceneSession {
    context: RenderContext,
    depth: DepthTarget,
    msaa: Option<MsaaTarget>,
    sample_count: u32,
    renderer: MatcapRenderer,
    controls: OrbitControls,
    scene: ComposedScene,
    clear_color: wgpu::Color,
    frames: u64,
}

impl SceneSession {
    /// Upload `scene` and set up the camera for the current surface size.
    pub fn init(
        context: RenderContext,
        options: &Options,
        scene: ComposedScene,
        matcap: &MatcapImage,
    ) -> Self {
        let (width, height) = context.size();
        let sample_count = options.display.sample_count();
        let depth =
            DepthTarget::new(&context.device, width, height, sample_count);
        let msaa = MsaaTarget::new(
            &context.device,
            width,
            height,
            context.format(),
            sample_count,
        );
        let renderer = MatcapRenderer::new(
            &context,
            &scene,
            matcap,
            options.display.tone_mapping,
            sample_count,
        );
        let controls = OrbitControls::new(&options.camera, width, height);
        let [r, g, b] = options.display.clear_color;

        log::info!(
            "session started: {} draws over {} meshes, {} instances, {}x MSAA",
            renderer.draw_count(),
            renderer.mesh_count(),
            scene.instance_count(),
            sample_count
        );

        Self {
            context,
            depth,
            msaa,
            sample_count,
            renderer,
            controls,
            scene,
            clear_color: wgpu::Color {
                r: f64::from(r),
                g: f64::from(g),
                b: f64::from(b),
                a: 1.0,
            },
            frames: 0,
        }
    }

    /// Advance camera damping and draw one frame.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] when the swapchain texture cannot be
    /// acquired; `Outdated`/`Lost` are recovered by calling
    /// [`resize`](Self::resize) with the current size.
    pub fn run_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let _ = self.controls.update();
        self.renderer
            .update_camera(&self.context.queue, &self.controls.uniform());

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // With MSAA the multisampled target resolves into the swapchain
        // view and its own samples are discarded.
        let (color_view, resolve_target, color_store) = match &self.msaa {
            Some(msaa) => (&msaa.view, Some(&view), wgpu::StoreOp::Discard),
            None => (&view, None, wgpu::StoreOp::Store),
        };

        let mut encoder = self.context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Scene Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: color_view,
                            resolve_target,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(self.clear_color),
                                store: color_store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Discard,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });
            self.renderer.draw(&mut pass);
        }
        self.context.submit(encoder);
        frame.present();

        self.frames += 1;
        Ok(())
    }

    /// Follow a viewport resize: camera aspect, surface and attachments.
    /// Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.depth = DepthTarget::new(
            &self.context.device,
            width,
            height,
            self.sample_count,
        );
        self.msaa = MsaaTarget::new(
            &self.context.device,
            width,
            height,
            self.context.format(),
            self.sample_count,
        );
        self.controls.resize(width, height);
    }

    /// Re-apply the current surface configuration after `Outdated`/`Lost`.
    pub fn reconfigure(&mut self) {
        let (width, height) = self.context.size();
        self.resize(width, height);
    }

    /// Orbit controls, for input handling.
    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Release GPU resources, waiting for in-flight work first.
    pub fn teardown(self) {
        if let Err(e) = self.context.device.poll(wgpu::PollType::Wait) {
            log::warn!("device poll during teardown failed: {e}");
        }
        log::info!(
            "session ended after {} frames (base hue {:.3})",
            self.frames,
            self.scene.base_hue
        );
    }
}
