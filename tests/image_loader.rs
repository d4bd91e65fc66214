use std::time::{Duration, Instant};

use image_text_composer::loader::ImageLoader;
use image_text_composer::{BackgroundImage, ComposerError, ComposerResult};

fn poll_until_done(
    loader: &mut ImageLoader,
) -> ComposerResult<std::sync::Arc<BackgroundImage>> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(outcome) = loader.poll() {
            return outcome;
        }
        assert!(Instant::now() < deadline, "decode did not finish in time");
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_unsupported_extension_is_rejected_synchronously() {
    let mut loader = ImageLoader::new();
    let err = loader
        .request_from_bytes("notes.txt".to_owned(), vec![1, 2, 3])
        .unwrap_err();
    assert!(matches!(err, ComposerError::UnsupportedImageType(_)));
    assert!(!loader.is_pending());
}

#[test]
fn test_decode_from_bytes() {
    let mut loader = ImageLoader::new();
    loader.request_from_bytes("drop.png".to_owned(), tiny_png()).unwrap();

    let image = poll_until_done(&mut loader).unwrap();
    assert_eq!(image.name, "drop.png");
    assert_eq!((image.width, image.height), (3, 2));
    assert_eq!(&image.rgba[..4], &[10, 20, 30, 255]);
    assert!(!loader.is_pending());
}

#[test]
fn test_decode_failure_is_reported() {
    let mut loader = ImageLoader::new();
    loader
        .request_from_bytes("broken.jpg".to_owned(), vec![0xde, 0xad, 0xbe, 0xef])
        .unwrap();

    let err = poll_until_done(&mut loader).unwrap_err();
    assert!(matches!(err, ComposerError::ImageDecode(_)));
}

#[test]
fn test_newer_request_wins() {
    let mut loader = ImageLoader::new();
    loader.request_from_bytes("old.png".to_owned(), tiny_png()).unwrap();
    loader.request_from_bytes("new.png".to_owned(), tiny_png()).unwrap();

    let image = poll_until_done(&mut loader).unwrap();
    assert_eq!(image.name, "new.png");
}
