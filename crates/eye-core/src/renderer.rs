use wgpu::util::DeviceExt;

use crate::animation::EyeFrame;
use crate::canvas::RenderHint;
use crate::geometry::Viewport;
use crate::outline::AlmondOutline;
use crate::painter::{Detail, EyeSurface};
use crate::theme::ThemePalette;

/// Everything the fragment shader needs for one frame, in logical pixels.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EyeUniforms {
    /// width, height, device pixel ratio, radial lines (0/1)
    pub viewport: [f32; 4],
    /// center x, center y, openness, glow (0/1)
    pub center: [f32; 4],
    /// iris radius, pupil radius, iris rotation, unused
    pub radii: [f32; 4],
    /// iris offset xy, pupil offset from the iris xy
    pub offsets: [f32; 4],
    /// Almond lids, see [`AlmondOutline::to_uniform_array`].
    pub outline: [[f32; 4]; 4],
    pub background: [f32; 4],
    pub outline_color: [f32; 4],
    pub iris_inner: [f32; 4],
    pub iris_outer: [f32; 4],
    pub pupil_color: [f32; 4],
    pub glow_color: [f32; 4],
    pub radial_color: [f32; 4],
}

impl Default for EyeUniforms {
    fn default() -> Self {
        Self::from_frame(
            &Viewport::default(),
            &EyeFrame {
                geometry: Default::default(),
                pupil: [0.0; 2],
                iris: [0.0; 2],
                blink: 1.0,
                squint: 0.0,
                iris_rotation: 0.0,
            },
            &ThemePalette::default(),
            Detail::REDUCED,
        )
    }
}

impl EyeUniforms {
    pub fn from_frame(
        viewport: &Viewport,
        frame: &EyeFrame,
        palette: &ThemePalette,
        detail: Detail,
    ) -> Self {
        let g = &frame.geometry;
        let openness = frame.openness();
        let glow = !palette.glow.is_transparent() && openness > 0.1;
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        Self {
            viewport: [
                viewport.width,
                viewport.height,
                viewport.device_pixel_ratio,
                flag(detail.radial_lines),
            ],
            center: [g.center[0], g.center[1], openness, flag(glow)],
            radii: [g.iris_radius, g.pupil_radius, frame.iris_rotation, 0.0],
            offsets: [
                frame.iris[0],
                frame.iris[1],
                (frame.pupil[0] - frame.iris[0]) * 0.5,
                (frame.pupil[1] - frame.iris[1]) * 0.5,
            ],
            outline: AlmondOutline::new(g.eye_width, g.eye_height, openness).to_uniform_array(),
            background: palette.background.to_array(),
            outline_color: palette.outline.to_array(),
            iris_inner: palette.iris_start.to_array(),
            iris_outer: palette.iris_end.to_array(),
            pupil_color: palette.pupil.to_array(),
            glow_color: palette.glow.to_array(),
            radial_color: palette.radial_lines.to_array(),
        }
    }
}

/// GPU surface for the eye: one full-screen triangle, all layers drawn in
/// the fragment shader.
pub struct EyeRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniforms: EyeUniforms,
    viewport: Viewport,
    hint: RenderHint,
}

impl EyeRenderer {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("almond_eye"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/eye.wgsl").into()),
        });

        // Layout is derived from the shader: one uniform block at @group(0) @binding(0).
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("almond_eye"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(target_format.into())],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniforms = EyeUniforms::default();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("almond_eye_uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("almond_eye_uniforms"),
            layout: &pipeline.get_bind_group_layout(0),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            uniforms,
            viewport: Viewport::default(),
            hint: RenderHint::Auto,
        }
    }

    pub fn uniforms(&self) -> &EyeUniforms {
        &self.uniforms
    }

    pub fn render_hint(&self) -> RenderHint {
        self.hint
    }

    /// Upload the most recently presented frame.
    pub fn prepare(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));
    }

    /// Record the eye draw into an open pass. Call [`prepare`](Self::prepare) first.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    /// Upload and draw in a pass of its own, clearing to the page background.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        queue: &wgpu::Queue,
    ) {
        self.prepare(queue);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("almond_eye"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color(self.uniforms.background)),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        self.draw(&mut pass);
    }
}

pub fn clear_color([r, g, b, a]: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: f64::from(a),
    }
}

impl EyeSurface for EyeRenderer {
    fn resize(&mut self, viewport: &Viewport) {
        self.viewport = *viewport;
        self.uniforms.viewport[..3].copy_from_slice(&[
            viewport.width,
            viewport.height,
            viewport.device_pixel_ratio,
        ]);
    }

    fn set_render_hint(&mut self, hint: RenderHint) {
        self.hint = hint;
    }

    fn present(&mut self, frame: &EyeFrame, palette: &ThemePalette, detail: Detail) {
        self.uniforms = EyeUniforms::from_frame(&self.viewport, frame, palette, detail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::geometry::EyeGeometry;
    use crate::theme::Color;

    #[test]
    fn uniform_block_is_vec4_aligned() {
        assert_eq!(std::mem::size_of::<EyeUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<EyeUniforms>(), 15 * 16);
    }

    #[test]
    fn frame_maps_into_uniforms() {
        let viewport = Viewport::new(800.0, 600.0, 2.0);
        let frame = EyeFrame {
            geometry: EyeGeometry::from_viewport(&viewport, &Tuning::default()),
            pupil: [10.0, 4.0],
            iris: [6.0, 2.0],
            blink: 0.0,
            squint: 0.0,
            iris_rotation: 1.25,
        };
        let u = EyeUniforms::from_frame(&viewport, &frame, &ThemePalette::dark(), Detail::FULL);

        assert_eq!(u.viewport, [800.0, 600.0, 2.0, 1.0]);
        assert_eq!(u.center, [400.0, 300.0, 1.0, 1.0]);
        assert_eq!(u.offsets, [6.0, 2.0, 2.0, 1.0]);
        assert_eq!(u.radii[2], 1.25);
        assert_eq!(u.outline[1][2], 280.0);
        assert_eq!(u.pupil_color, Color::BLACK.to_array());
    }

    #[test]
    fn light_theme_disables_glow() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        let frame = EyeFrame {
            geometry: EyeGeometry::from_viewport(&viewport, &Tuning::default()),
            pupil: [0.0; 2],
            iris: [0.0; 2],
            blink: 0.0,
            squint: 0.0,
            iris_rotation: 0.0,
        };
        let u = EyeUniforms::from_frame(&viewport, &frame, &ThemePalette::light(), Detail::REDUCED);
        assert_eq!(u.center[3], 0.0);
        assert_eq!(u.viewport[3], 0.0);
    }
}
