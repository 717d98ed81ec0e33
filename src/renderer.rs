//! GPU side: one pipeline, one uniform, one full-viewport draw per frame.

use anyhow::{anyhow, bail, Context};
use bytemuck::{Pod, Zeroable};
use log::{debug, info, warn};
use winit::window::Window;

use crate::{
    command_encoder::{self, CommandEncoderExt},
    complex::Complex,
    screen::Size,
    settings::Settings,
    state::InteractionState,
    uniform::{self, Uniform},
};

/// Vertices of the triangle strip covering the viewport.
pub const QUAD_VERTICES: u32 = 4;

/// Sample counts every wgpu adapter supports for render attachments.
pub const SUPPORTED_SAMPLE_COUNTS: [u32; 2] = [1, 4];

/// Corresponds to `julia.wgsl#Params`.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct Params {
    pub offset: Complex,
    pub julia_c: Complex,
    pub zoom: f64,
    pub resolution: [f32; 2],
    pub max_iterations: u32,
    pub invert: u32,
    pub colour_mode: u32,
    pub padding: u32,
}

impl From<&InteractionState> for Params {
    fn from(state: &InteractionState) -> Self {
        Self {
            offset: state.view.offset,
            julia_c: state.julia,
            zoom: state.view.zoom,
            resolution: [
                state.resolution.width as f32,
                state.resolution.height as f32,
            ],
            max_iterations: state.config.max_iterations,
            invert: state.config.invert as u32,
            colour_mode: state.config.colour_mode.as_uniform(),
            padding: 0,
        }
    }
}

/// Outcome of [`Renderer::render`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame {
    Presented,
    /// The surface was unavailable; nothing was drawn.
    Skipped,
}

pub struct Renderer {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_configuration: wgpu::SurfaceConfiguration,
    sample_count: u32,
    multisampled_framebuffer: Option<wgpu::TextureView>,
    render_pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    params: Uniform<Params>,
}

impl Renderer {
    /// Set up a surface on `window`. `window` must outlive the renderer.
    pub fn new(window: &Window, settings: &Settings, initial: Params) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(wgpu::Backends::all());
        let surface = unsafe { instance.create_surface(window) };

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .ok_or_else(|| anyhow!("no graphics adapter can present to this window"))?;

        let adapter_info = adapter.get_info();
        info!(
            "using {} ({:?} backend)",
            adapter_info.name, adapter_info.backend
        );

        if !adapter.features().contains(wgpu::Features::SHADER_FLOAT64) {
            bail!(
                "{} does not support double-precision shaders",
                adapter_info.name
            );
        }

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("device"),
                features: wgpu::Features::SHADER_FLOAT64,
                limits: wgpu::Limits::default(),
            },
            None,
        ))
        .map_err(|error| anyhow!("failed to create graphics device: {}", error))?;

        let format = choose_format(&surface.get_supported_formats(&adapter))
            .context("surface reports no supported texture formats")?;
        let present_mode =
            choose_present_mode(&surface.get_supported_present_modes(&adapter), settings.vsync);
        let sample_count = choose_sample_count(settings.sample_count);
        debug!(
            "surface format {:?}, {:?}, {}x MSAA",
            format, present_mode, sample_count
        );

        let surface_configuration = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: settings.size.width,
            height: settings.size.height,
            present_mode,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
        };
        surface.configure(&device, &surface_configuration);

        let params = uniform::Builder::new(initial)
            .with_label("params-buffer")
            .create(&device);

        // Shader compilation problems surface here rather than on first draw.
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("julia-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("julia.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("julia-bind-group-layout"),
            entries: &[Uniform::<Params>::layout_entry(
                0,
                wgpu::ShaderStages::FRAGMENT,
            )],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("julia-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("julia-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vertex_main",
                buffers: &[],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fragment_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            bail!("julia shader pipeline is invalid: {}", error);
        }

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("julia-bind-group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: params.binding_resource(),
            }],
        });

        let multisampled_framebuffer =
            create_multisampled_framebuffer(&device, &surface_configuration, sample_count);

        Ok(Self {
            surface,
            device,
            queue,
            surface_configuration,
            sample_count,
            multisampled_framebuffer,
            render_pipeline,
            bind_group,
            params,
        })
    }

    pub fn resize(&mut self, size: Size) {
        // Minimised windows report a zero size, which the surface rejects.
        if size.width == 0 || size.height == 0 {
            return;
        }
        debug!("resizing to {:?}", size);

        self.surface_configuration.width = size.width;
        self.surface_configuration.height = size.height;
        self.surface
            .configure(&self.device, &self.surface_configuration);
        self.multisampled_framebuffer = create_multisampled_framebuffer(
            &self.device,
            &self.surface_configuration,
            self.sample_count,
        );
    }

    /// Clear, upload `params` and draw the fractal over the whole surface.
    pub fn render(&mut self, params: Params) -> anyhow::Result<Frame> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                self.surface
                    .configure(&self.device, &self.surface_configuration);
                return Ok(Frame::Skipped);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("timed out waiting for the next surface texture");
                return Ok(Frame::Skipped);
            }
            Err(error) => return Err(anyhow!("failed to acquire surface texture: {}", error)),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (view, resolve_target) = match &self.multisampled_framebuffer {
            Some(framebuffer) => (framebuffer, Some(&surface_texture_view)),
            None => (&surface_texture_view, None),
        };

        self.params.write(&self.queue, params);

        let command_buffer = command_encoder::record(&self.device, "frame", |command_encoder| {
            command_encoder.push_debug_group("render-pass");
            command_encoder.with_render_pass(
                &wgpu::RenderPassDescriptor {
                    label: Some("julia-pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: true,
                        },
                    })],
                    depth_stencil_attachment: None,
                },
                |render_pass| {
                    render_pass.set_pipeline(&self.render_pipeline);
                    render_pass.set_bind_group(0, &self.bind_group, &[]);
                    render_pass.draw(0..QUAD_VERTICES, 0..1);
                },
            );
            command_encoder.pop_debug_group();
        });

        self.queue.submit([command_buffer]);
        surface_texture.present();
        Ok(Frame::Presented)
    }
}

fn create_multisampled_framebuffer(
    device: &wgpu::Device,
    surface_configuration: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("multisampled-framebuffer"),
        size: wgpu::Extent3d {
            width: surface_configuration.width,
            height: surface_configuration.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: surface_configuration.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}

/// Prefer a linear format so shader output reaches the screen unconverted.
fn choose_format(supported: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    supported
        .iter()
        .copied()
        .find(|format| !format.describe().srgb)
        .or_else(|| supported.first().copied())
}

fn choose_present_mode(supported: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    if supported.contains(&wgpu::PresentMode::Immediate) {
        wgpu::PresentMode::Immediate
    } else {
        warn!("surface cannot present immediately, falling back to vsync");
        wgpu::PresentMode::Fifo
    }
}

fn choose_sample_count(requested: u32) -> u32 {
    if SUPPORTED_SAMPLE_COUNTS.contains(&requested) {
        requested
    } else {
        let fallback = SUPPORTED_SAMPLE_COUNTS[SUPPORTED_SAMPLE_COUNTS.len() - 1];
        warn!(
            "{}x MSAA is not supported, using {}x",
            requested, fallback
        );
        fallback
    }
}
