use std::sync::Arc;

use wgpu::{
    BindGroup, BindGroupLayout, Device, Extent3d, Queue, RenderPipeline, Surface,
    SurfaceConfiguration, Texture,
};
use winit::window::Window;

use super::gpu_context::GpuContext;
use crate::error::RenderError;

type Result<T> = std::result::Result<T, RenderError>;

/// Texture the CPU raster is uploaded into, sized to the raster rather than
/// the surface
struct FrameTexture {
    texture: Texture,
    bind_group: BindGroup,
    size: Extent3d,
}

impl FrameTexture {
    fn new(device: &Device, layout: &BindGroupLayout, width: u32, height: u32) -> Self {
        let size = Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("replay frame"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            // raster colors are already sRGB encoded
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("replay frame"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            }],
        });

        Self {
            texture,
            bind_group,
            size,
        }
    }

    fn matches(&self, width: u32, height: u32) -> bool {
        self.size.width == width && self.size.height == height
    }

    fn upload(&self, queue: &Queue, pixels: &[u8]) {
        queue.write_texture(
            self.texture.as_image_copy(),
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.size.width),
                rows_per_image: Some(self.size.height),
            },
            self.size,
        );
    }
}

/// Presents CPU pixel buffers on a window surface.
///
/// The frame texture follows the size of whatever buffer is presented; the
/// shader stretches it over the whole surface with nearest texel lookups.
pub struct SurfaceRenderer {
    gpu: GpuContext,
    surface: Surface<'static>,
    config: SurfaceConfiguration,
    pipeline: RenderPipeline,
    frame: FrameTexture,
}

impl SurfaceRenderer {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::Surface(format!("Failed to create surface: {}", e)))?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;

        let config = surface
            .get_default_config(gpu.adapter(), width, height)
            .ok_or_else(|| RenderError::Surface("Surface not supported by adapter".to_string()))?;
        surface.configure(gpu.device(), &config);

        let pipeline = Self::create_pipeline(gpu.device(), config.format);
        let layout = pipeline.get_bind_group_layout(0);
        let frame = FrameTexture::new(gpu.device(), &layout, width, height);

        Ok(Self {
            gpu,
            surface,
            config,
            pipeline,
            frame,
        })
    }

    /// Upload an RGBA8 buffer and present it
    pub fn render_pixels(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<()> {
        if !check_frame_buffer(pixels, width, height)? {
            return Ok(());
        }

        if !self.frame.matches(width, height) {
            let layout = self.pipeline.get_bind_group_layout(0);
            self.frame = FrameTexture::new(self.gpu.device(), &layout, width, height);
        }
        self.frame.upload(self.gpu.queue(), pixels);

        let output = self
            .surface
            .get_current_texture()
            .map_err(|e| RenderError::Surface(e.to_string()))?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("present") });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("present"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.frame.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Reconfigure the swapchain; a collapsed window keeps the old size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(self.gpu.device(), &self.config);
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Bind group layout is derived from the shader
    fn create_pipeline(device: &Device, format: wgpu::TextureFormat) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("present"),
            source: wgpu::ShaderSource::Wgsl(include_str!("display.wgsl").into()),
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("present"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(format.into())],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

/// Validates an RGBA8 buffer against its dimensions; false for an empty frame
fn check_frame_buffer(pixels: &[u8], width: u32, height: u32) -> Result<bool> {
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            got: pixels.len(),
        });
    }
    Ok(expected > 0)
}
