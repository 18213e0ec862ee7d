use anyhow::{Context, Result};
use std::path::Path;

use crate::texture::TextureSize;

/// A sampled RGBA8 texture resident on the GPU.
#[derive(Debug)]
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// Fully decodes an image file to RGBA8.
///
/// Fails for unreadable or truncated files, empty images, and images with a
/// side longer than `max_dimension`.
pub fn decode_image(path: &Path, max_dimension: u32) -> Result<image::RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("failed to decode image '{}'", path.display()))?
        .to_rgba8();

    let (width, height) = img.dimensions();
    check_dimensions(width, height, max_dimension)
        .with_context(|| format!("cannot use image '{}'", path.display()))?;
    Ok(img)
}

fn check_dimensions(width: u32, height: u32, max_dimension: u32) -> Result<()> {
    anyhow::ensure!(width > 0 && height > 0, "image is empty");
    anyhow::ensure!(
        width <= max_dimension && height <= max_dimension,
        "image is {width}x{height}, larger than the {max_dimension} pixel texture limit"
    );
    Ok(())
}

impl GpuTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Decodes the image at `path` and uploads it.
    ///
    /// Images larger than the device's 2D texture limit are rejected.
    pub fn from_path(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Result<Self> {
        let img = decode_image(path, device.limits().max_texture_dimension_2d)?;
        let (width, height) = img.dimensions();

        let label = path.display().to_string();
        Ok(Self::from_rgba8(device, queue, &label, width, height, img.as_raw()))
    }

    /// Uploads tightly packed RGBA8 pixels.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Self {
        let texture = Self::create(device, label, width, height);
        Self::write(queue, &texture, 0, 0, width, height, pixels);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Allocates an uninitialized texture that can be filled later with
    /// [`GpuTexture::write_region`].
    pub fn empty(device: &wgpu::Device, label: &str, width: u32, height: u32) -> Self {
        let texture = Self::create(device, label, width, height);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Writes RGBA8 pixels into the sub-rectangle at `(x, y)`.
    pub fn write_region(&self, queue: &wgpu::Queue, x: u32, y: u32, w: u32, h: u32, pixels: &[u8]) {
        Self::write(queue, &self.texture, x, y, w, h, pixels);
    }

    fn create(device: &wgpu::Device, label: &str, width: u32, height: u32) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    fn write(queue: &wgpu::Queue, texture: &wgpu::Texture, x: u32, y: u32, w: u32, h: u32, pixels: &[u8]) {
        if w == 0 || h == 0 {
            return;
        }
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w * 4),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );
    }
}

impl TextureSize for GpuTexture {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        image::RgbaImage::from_pixel(width, height, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn decodes_within_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_png(dir.path(), "ok.png", 8, 4);
        let img = decode_image(&path, 8).unwrap();
        assert_eq!(img.dimensions(), (8, 4));
    }

    #[test]
    fn rejects_images_over_the_texture_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_png(dir.path(), "wide.png", 10_000, 2);
        let limit = wgpu::Limits::default().max_texture_dimension_2d;
        let err = decode_image(&path, limit).unwrap_err();
        assert!(format!("{err:#}").contains("texture limit"), "{err:#}");
    }

    #[test]
    fn rejects_truncated_pixel_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_png(dir.path(), "cut.png", 64, 64);
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 20]).unwrap();

        assert!(image::image_dimensions(&path).is_ok());
        assert!(decode_image(&path, 8192).is_err());
    }

    #[test]
    fn dimension_checks() {
        assert!(check_dimensions(8192, 1, 8192).is_ok());
        assert!(check_dimensions(8193, 1, 8192).is_err());
        assert!(check_dimensions(1, 8193, 8192).is_err());
        assert!(check_dimensions(0, 4, 8192).is_err());
    }
}
