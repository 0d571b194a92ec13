use std::sync::Arc;
use wgpu::{BindGroup, BindGroupLayout, Device, Queue, RenderPipeline, Surface, SurfaceConfiguration, Texture};
use winit::window::Window;

use super::abi::BYTES_PER_PIXEL;
use super::layout::Layout;
use crate::error::{HostError, Result};
use crate::traits::Painter;

/// Reject surfaces the device cannot hold in a single 2D texture.
pub fn check_surface_size(surface_size: (u32, u32), max_dimension: u32) -> Result<()> {
    let (width, height) = surface_size;
    if width > max_dimension || height > max_dimension {
        return Err(HostError::SurfaceTooLarge {
            width,
            height,
            max: max_dimension,
        });
    }
    Ok(())
}

/// Texture holding the module's pixel buffer, with one bind group per sampler
struct SurfaceTarget {
    texture: Texture,
    nearest_bind_group: BindGroup,
    linear_bind_group: BindGroup,
    width: u32,
    height: u32,
}

/// Paints a compute module's RGBA surface into a window.
///
/// The swapchain is created with the window; the surface texture follows
/// once the module has reported its dimensions. Every frame the pixel buffer
/// is uploaded and blitted into the layout's display rectangle, with nearest
/// sampling when magnified and linear sampling when shrunk.
pub struct SurfaceRenderer {
    device: Device,
    queue: Queue,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    render_pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
    target: Option<SurfaceTarget>,
}

impl SurfaceRenderer {
    /// Create a renderer presenting into `window`
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window).map_err(HostError::display)?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let surface_config = Self::create_surface_config(&surface, &adapter, size.width, size.height);
        if surface_config.width > 0 && surface_config.height > 0 {
            surface.configure(&device, &surface_config);
        }

        let (render_pipeline, bind_group_layout) =
            Self::create_render_pipeline(&device, surface_config.format);

        log::info!(
            "Renderer ready: {:?} swapchain, textures up to {}px",
            surface_config.format,
            device.limits().max_texture_dimension_2d
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            render_pipeline,
            bind_group_layout,
            target: None,
        })
    }

    /// Allocate the surface texture for a `surface_size` pixel buffer
    pub fn set_surface_size(&mut self, surface_size: (u32, u32)) -> Result<()> {
        check_surface_size(surface_size, self.device.limits().max_texture_dimension_2d)?;
        let (width, height) = surface_size;

        let texture = Self::create_surface_texture(&self.device, width, height);
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let nearest_bind_group = Self::create_bind_group(
            &self.device,
            &self.bind_group_layout,
            &texture_view,
            wgpu::FilterMode::Nearest,
        );
        let linear_bind_group = Self::create_bind_group(
            &self.device,
            &self.bind_group_layout,
            &texture_view,
            wgpu::FilterMode::Linear,
        );

        log::debug!("Surface texture {}x{}", width, height);
        self.target = Some(SurfaceTarget {
            texture,
            nearest_bind_group,
            linear_bind_group,
            width,
            height,
        });
        Ok(())
    }

    /// Reconfigure the swapchain for a new window size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Current swapchain size
    pub fn viewport(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    fn target(&self) -> Result<&SurfaceTarget> {
        self.target
            .as_ref()
            .ok_or_else(|| HostError::display("surface texture not allocated"))
    }

    fn upload(&self, pixels: &[u8]) -> Result<()> {
        let target = self.target()?;
        let expected_size = target.width as usize * target.height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected_size {
            return Err(HostError::Display(format!(
                "Invalid pixel buffer size: expected {} bytes, got {}",
                expected_size,
                pixels.len()
            )));
        }

        self.queue.write_texture(
            target.texture.as_image_copy(),
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(BYTES_PER_PIXEL as u32 * target.width),
                rows_per_image: Some(target.height),
            },
            wgpu::Extent3d {
                width: target.width,
                height: target.height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    fn acquire_frame(&mut self) -> Result<Option<wgpu::SurfaceTexture>> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                log::debug!("Swapchain out of date, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Swapchain timed out, dropping frame");
                Ok(None)
            }
            Err(e) => Err(HostError::display(e)),
        }
    }

    fn create_surface_config(
        surface: &Surface,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> SurfaceConfiguration {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    /// Texture holding one copy of the module's pixel buffer
    fn create_surface_texture(device: &Device, width: u32, height: u32) -> Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Compute Surface Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    fn create_render_pipeline(
        device: &Device,
        surface_format: wgpu::TextureFormat,
    ) -> (RenderPipeline, BindGroupLayout) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Surface Display Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("display.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Surface Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Surface Render Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Surface Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group_layout)
    }

    fn create_bind_group(
        device: &Device,
        layout: &BindGroupLayout,
        texture_view: &wgpu::TextureView,
        filter: wgpu::FilterMode,
    ) -> BindGroup {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Surface Texture Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            ..Default::default()
        });

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Surface Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        })
    }

    async fn request_adapter(instance: &wgpu::Instance, surface: &Surface<'_>) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| HostError::Display(format!("Failed to find appropriate adapter: {:?}", e)))
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(Device, Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Frame Host Device"),
                required_features: wgpu::Features::empty(),
                // Largest textures the adapter offers, for big module surfaces
                required_limits: adapter.limits(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(HostError::display)
    }
}

impl Painter for SurfaceRenderer {
    fn paint(&mut self, pixels: &[u8], layout: &Layout) -> Result<()> {
        self.upload(pixels)?;

        // Swapchain and layout can disagree for a frame while a resize is in flight
        if layout.viewport != self.viewport() {
            return Ok(());
        }

        let Some(frame) = self.acquire_frame()? else {
            return Ok(());
        };
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let target = self.target()?;
        let bind_group = if layout.fit.is_pixelated() {
            &target.nearest_bind_group
        } else {
            &target.linear_bind_group
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Surface Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Surface Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame_view,
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

            let rect = layout.rect;
            render_pass.set_viewport(
                rect.x as f32,
                rect.y as f32,
                rect.width as f32,
                rect.height as f32,
                0.0,
                1.0,
            );
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();

        Ok(())
    }
}
