use crate::error::ResourceLoadError;
use image::RgbImage;
use log::info;
use nalgebra::{Vector2, Vector3};
use std::path::Path;
use std::sync::Arc;

/// Represents a 2D texture map, sampled with nearest-neighbour lookup.
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: Arc<RgbImage>,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ResourceLoadError> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref).map_err(|source| ResourceLoadError::Image {
            path: path_ref.to_path_buf(),
            source,
        })?;

        let texture = Self::from_image(img.to_rgb8());
        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref, texture.width, texture.height
        );
        Ok(texture)
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            image: Arc::new(image),
        }
    }

    /// A 1x1 texture of a single color (channels in [0, 1]).
    pub fn solid(color: Vector3<f32>) -> Self {
        let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::from_image(RgbImage::from_pixel(
            1,
            1,
            image::Rgb([to_u8(color.x), to_u8(color.y), to_u8(color.z)]),
        ))
    }

    /// Samples the texel at `floor(uv * (dimension - 1))`.
    ///
    /// UV coordinates outside [0, 1] are clamped to the border texel.
    /// Channels are returned in [0, 1] without color-space conversion.
    pub fn sample(&self, uv: Vector2<f32>) -> Vector3<f32> {
        let u = uv.x.clamp(0.0, 1.0);
        let v = uv.y.clamp(0.0, 1.0);

        let x = (u * (self.width - 1) as f32).floor() as u32;
        let y = (v * (self.height - 1) as f32).floor() as u32;

        let pixel = self.image.get_pixel(x, y);
        Vector3::new(
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        )
    }
}
