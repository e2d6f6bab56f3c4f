//! Integration tests for texture loading.

use roomview_resources::TextureImage;

#[test]
fn test_load_png_roundtrip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("pizza.png");

    // Write a 2x2 PNG with distinct corner colors.
    let mut img = image::RgbaImage::new(2, 2);
    img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, image::Rgba([0, 255, 0, 255]));
    img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
    img.put_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
    img.save(&path).expect("Failed to save test image");

    let texture = TextureImage::load(&path).expect("Failed to load texture");

    assert_eq!(texture.width, 2);
    assert_eq!(texture.height, 2);
    assert_eq!(texture.pixels.len(), 2 * 2 * 4);
    assert_eq!(&texture.pixels[0..4], &[255, 0, 0, 255]);
    assert_eq!(&texture.pixels[12..16], &[255, 255, 255, 255]);
}

#[test]
fn test_load_or_fallback_resolves_extension() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]));
    img.save(dir.path().join("bricks.png"))
        .expect("Failed to save test image");

    // Name has no extension; the loader finds the .png.
    let texture = TextureImage::load_or_fallback(dir.path(), "bricks");
    assert_eq!(texture.width, 4);
    assert_eq!(&texture.pixels[0..4], &[10, 20, 30, 255]);
}

#[test]
fn test_load_or_fallback_corrupt_file_is_checker() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("lava.jpg"), b"not an image").expect("Failed to write file");

    let texture = TextureImage::load_or_fallback(dir.path(), "lava");
    // Undecodable file falls back to the 8x8 checker.
    assert_eq!(texture.width, 8);
    assert_eq!(texture.height, 8);
}
