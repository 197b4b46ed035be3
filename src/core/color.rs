use nalgebra::Vector3;

pub const BLACK: Vector3<f32> = Vector3::new(0.0, 0.0, 0.0);
pub const WHITE: Vector3<f32> = Vector3::new(1.0, 1.0, 1.0);

/// Brings an overflowing color back into range while preserving its hue.
///
/// If any channel exceeds 1.0, every channel is divided by the largest one.
/// Colors already in range are returned unchanged.
pub fn max_to_one(color: Vector3<f32>) -> Vector3<f32> {
    let max = color.x.max(color.y).max(color.z);
    if max > 1.0 { color / max } else { color }
}

/// Quantizes a [0, 1] color to 8 bits per channel and packs it as 0RGB.
/// Negative channels are clamped to zero.
pub fn pack_rgb(color: Vector3<f32>) -> u32 {
    let r = (color.x.clamp(0.0, 1.0) * 255.0) as u32;
    let g = (color.y.clamp(0.0, 1.0) * 255.0) as u32;
    let b = (color.z.clamp(0.0, 1.0) * 255.0) as u32;
    (r << 16) | (g << 8) | b
}

/// Splits a packed 0RGB value into its 8-bit channels.
pub fn unpack_rgb(packed: u32) -> [u8; 3] {
    [
        ((packed >> 16) & 0xFF) as u8,
        ((packed >> 8) & 0xFF) as u8,
        (packed & 0xFF) as u8,
    ]
}

/// Final per-pixel output step shared by both pipelines.
#[inline]
pub fn to_output(color: Vector3<f32>) -> u32 {
    pack_rgb(max_to_one(color))
}
