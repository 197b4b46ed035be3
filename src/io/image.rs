use crate::core::color::unpack_rgb;
use crate::error::ResourceLoadError;
use image::{ImageBuffer, Rgb};
use log::info;
use std::path::Path;

/// Saves a u32 (0RGB) buffer to an image file; the format follows the extension.
pub fn save_buffer_to_image<P: AsRef<Path>>(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: P,
) -> Result<(), ResourceLoadError> {
    let expected = width * height;
    if buffer.len() != expected {
        return Err(ResourceLoadError::BufferSize {
            expected,
            actual: buffer.len(),
        });
    }

    let img_buf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        Rgb(unpack_rgb(buffer[y as usize * width + x as usize]))
    });

    let path = path.as_ref();
    img_buf.save(path).map_err(|source| ResourceLoadError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Saved {}x{} image to {:?}", width, height, path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        let err = save_buffer_to_image(&[0; 3], 2, 2, "unused.png").unwrap_err();
        assert!(matches!(
            err,
            ResourceLoadError::BufferSize {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn writes_and_reads_back_pixels() {
        let path = std::env::temp_dir().join("softrender_save_test.png");
        let buffer = [0x00FF0000, 0x0000FF00, 0x000000FF, 0x00FFFFFF];
        save_buffer_to_image(&buffer, 2, 2, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 255, 0]);
        assert_eq!(img.get_pixel(0, 1).0, [0, 0, 255]);
        let _ = std::fs::remove_file(&path);
    }
}
