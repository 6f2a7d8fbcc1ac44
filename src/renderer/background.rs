//! Optional background picture
//!
//! A random `.jpg`/`.jpeg` below the configured directory is stretched over
//! the whole window. Without one the frame is cleared to the fill color.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use image::imageops::{self, FilterType};
use rand::Rng;
use thiserror::Error;

/// Largest texture side every device accepts
pub const MAX_PICTURE_SIDE: u32 = 2048;

#[derive(Debug, Error)]
pub enum BackgroundError {
    #[error("cannot read background {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Every JPEG picture below `dir`, sorted by path
///
/// Unreadable directories are skipped; a missing `dir` yields nothing.
pub fn find_pictures(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("Skipping {}: {e}", current.display());
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if is_jpeg(&path) {
                found.push(path);
            }
        }
    }
    found.sort();
    found
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
}

/// Pick one picture at random
pub fn choose<'a>(rng: &mut impl Rng, pictures: &'a [PathBuf]) -> Option<&'a Path> {
    if pictures.is_empty() {
        return None;
    }
    Some(pictures[rng.random_range(0..pictures.len())].as_path())
}

/// Decode a picture to RGBA
pub fn load_picture(path: &Path) -> Result<RgbaImage, BackgroundError> {
    let picture = image::open(path).map_err(|source| BackgroundError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(picture.to_rgba8())
}

/// Scale a picture to `width`x`height`, each side capped at `max_side`
pub fn stretch(picture: RgbaImage, width: u32, height: u32, max_side: u32) -> RgbaImage {
    let width = width.clamp(1, max_side.max(1));
    let height = height.clamp(1, max_side.max(1));
    if picture.dimensions() == (width, height) {
        return picture;
    }
    imageops::resize(&picture, width, height, FilterType::Triangle)
}

/// Find, pick and decode a background stretched to `size`
///
/// Logs and returns `None` on any miss.
pub fn pick_background(rng: &mut impl Rng, dir: &Path, size: (u32, u32)) -> Option<RgbaImage> {
    let pictures = find_pictures(dir);
    let Some(path) = choose(rng, &pictures) else {
        log::warn!("No background pictures under {}, using fill color", dir.display());
        return None;
    };
    match load_picture(path) {
        Ok(picture) => {
            log::info!(
                "Background {} ({}x{})",
                path.display(),
                picture.width(),
                picture.height()
            );
            Some(stretch(picture, size.0, size.1, MAX_PICTURE_SIDE))
        }
        Err(e) => {
            log::warn!("{e}, using fill color");
            None
        }
    }
}

/// GPU side: a texture drawn as a fullscreen triangle
pub struct BackgroundLayer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
}

impl BackgroundLayer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        picture: &RgbaImage,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: picture.width(),
            height: picture.height(),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("background_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            picture.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * picture.width()),
                rows_per_image: Some(picture.height()),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("background_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("background_bind_group_layout"),
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
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("background_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("background_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("background.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("background_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("background_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
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
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1); // Fullscreen triangle
    }
}
