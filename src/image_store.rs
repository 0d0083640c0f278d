use crate::errors::StoreError;
use crate::paths::{label_dir, new_image_filename};
use image::{codecs::jpeg::JpegEncoder, DynamicImage};
use std::{fs, path::PathBuf};
use tracing::debug;

const JPEG_QUALITY: u8 = 90;

/// Writes photos as JPEGs under `<root>/<label>/`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[cfg(test)]
    fn path_for(&self, label: &str, filename: &str) -> Result<PathBuf, StoreError> {
        Ok(label_dir(&self.root, label)?.join(filename))
    }

    /// Decodes `image_bytes`, re-encodes as JPEG and returns the new file name.
    ///
    /// Nothing touches the disk until the bytes decode, so a bad upload
    /// leaves no empty label folder behind.
    pub fn save(&self, label: &str, image_bytes: &[u8]) -> Result<String, StoreError> {
        let dir = label_dir(&self.root, label)?;
        if image_bytes.is_empty() {
            return Err(StoreError::validation("image is required"));
        }

        let decoded = image::load_from_memory(image_bytes).map_err(StoreError::ImageDecode)?;
        let encoded = encode_jpeg(&decoded)?;

        fs::create_dir_all(&dir).map_err(|err| StoreError::io(&dir, err))?;
        let filename = new_image_filename();
        let path = dir.join(&filename);
        fs::write(&path, encoded).map_err(|err| StoreError::io(&path, err))?;

        debug!(path = %path.display(), "image written");
        Ok(filename)
    }
}

fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, StoreError> {
    // JPEG has no alpha channel.
    let rgb = image.to_rgb8();
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    rgb.write_with_encoder(encoder).map_err(StoreError::ImageEncode)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn saved_image_reads_back_with_same_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("dataset"));
        let original = RgbImage::from_pixel(16, 16, Rgb([200, 40, 60]));
        let bytes = png_bytes(DynamicImage::ImageRgb8(original));

        let filename = store.save("apple", &bytes).unwrap();
        let path = store.path_for("apple", &filename).unwrap();
        assert!(path.starts_with(dir.path().join("dataset").join("apple")));

        let restored = image::open(&path).unwrap().to_rgb8();
        assert_eq!(restored.dimensions(), (16, 16));
        for pixel in restored.pixels() {
            for (got, want) in pixel.0.iter().zip([200u8, 40, 60]) {
                assert!(got.abs_diff(want) <= 6, "pixel {pixel:?} drifted too far");
            }
        }
    }

    #[test]
    fn transparent_png_is_flattened_to_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let bytes = png_bytes(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            4,
            4,
            Rgba([10, 20, 30, 128]),
        )));

        let filename = store.save("ramen", &bytes).unwrap();
        let written = fs::read(store.path_for("ramen", &filename).unwrap()).unwrap();
        assert_eq!(
            image::guess_format(&written).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn second_save_reuses_existing_label_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let bytes = png_bytes(DynamicImage::ImageRgb8(RgbImage::new(2, 2)));

        let first = store.save("kimchi", &bytes).unwrap();
        let second = store.save("kimchi", &bytes).unwrap();
        assert_ne!(first, second);
        assert_eq!(fs::read_dir(dir.path().join("kimchi")).unwrap().count(), 2);
    }

    #[test]
    fn undecodable_bytes_leave_no_folder() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let err = store.save("apple", b"definitely not a png").unwrap_err();
        assert!(matches!(err, StoreError::ImageDecode(_)));
        assert!(!dir.path().join("apple").exists());
    }

    #[test]
    fn too_wide_for_jpeg_is_an_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let bytes = png_bytes(DynamicImage::ImageRgb8(RgbImage::new(70_000, 1)));
        assert!(image::load_from_memory(&bytes).is_ok());

        let err = store.save("apple", &bytes).unwrap_err();
        assert!(matches!(err, StoreError::ImageEncode(_)), "got {err:?}");
        assert!(!dir.path().join("apple").exists());
    }

    #[test]
    fn unwritable_root_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("dataset");
        fs::write(&blocker, b"a file where the folder should be").unwrap();
        let store = ImageStore::new(&blocker);
        let bytes = png_bytes(DynamicImage::ImageRgb8(RgbImage::new(2, 2)));

        let err = store.save("apple", &bytes).unwrap_err();
        assert!(matches!(err, StoreError::StorageIo { .. }));
    }
}
