use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat as Codec, Rgb, RgbImage};
use img2pdf_core::*;
use std::io::Cursor;

fn encode(img: DynamicImage, codec: Codec) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, codec).unwrap();
    buf.into_inner()
}

/// Deterministic noise, which JPEG cannot compress well
fn noisy(width: u32, height: u32) -> DynamicImage {
    let mut state: u32 = 0x1234_5678;
    let img = RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        Rgb([next(), next(), next()])
    });
    DynamicImage::ImageRgb8(img)
}

fn gradient(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
    });
    DynamicImage::ImageRgb8(img)
}

fn dimensions(file: &SelectedFile) -> (u32, u32) {
    image::load_from_memory(&file.bytes).unwrap().dimensions()
}

#[test]
fn test_large_image_bounded_by_size_and_edge() {
    let input = SelectedFile::new(
        "big.png",
        ImageFormat::Png,
        encode(gradient(3000, 2000), Codec::Png),
    );
    let options = CompressionOptions::default();

    let output = compress_image(&input, &options).unwrap();

    assert_eq!(output.name, "big.png");
    assert_eq!(output.format, ImageFormat::Jpeg);
    assert!(output.size() <= 1024 * 1024);
    let (w, h) = dimensions(&output);
    assert_eq!((w, h), (1920, 1280));
}

#[test]
fn test_large_photo_jpeg_bounded_by_size_and_edge() {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, 95);
    noisy(2800, 2100).write_with_encoder(encoder).unwrap();
    let input = SelectedFile::new("photo.jpg", ImageFormat::Jpeg, buf);
    assert!(input.size() > 5 * 1024 * 1024);

    let output = compress_image(&input, &CompressionOptions::default()).unwrap();

    assert_eq!(output.format, ImageFormat::Jpeg);
    assert!(output.size() <= 1024 * 1024, "{} bytes", output.size());
    let (w, h) = dimensions(&output);
    assert!(w.max(h) <= 1920);
    assert!((w as f64 / h as f64 - 4.0 / 3.0).abs() < 0.01);
}

#[test]
fn test_quality_and_dimensions_reduced_until_size_fits() {
    let input = SelectedFile::new(
        "noise.png",
        ImageFormat::Png,
        encode(noisy(300, 300), Codec::Png),
    );
    let options = CompressionOptions {
        max_size_bytes: 20 * 1024,
        ..Default::default()
    };
    assert!(input.size() > options.max_size_bytes);

    let output = compress_image(&input, &options).unwrap();

    assert!(output.size() <= options.max_size_bytes);
    let (w, h) = dimensions(&output);
    assert!(w <= 300 && h <= 300);
    assert_eq!(w, h);
}

#[test]
fn test_small_jpeg_passes_through() {
    let bytes = encode(gradient(64, 48), Codec::Jpeg);
    let input = SelectedFile::new("small.jpg", ImageFormat::Jpeg, bytes.clone());

    let output = compress_image(&input, &CompressionOptions::default()).unwrap();
    assert_eq!(output.bytes, bytes);
}

#[test]
fn test_png_within_limits_becomes_jpeg() {
    let input = SelectedFile::new(
        "icon.png",
        ImageFormat::Png,
        encode(gradient(32, 32), Codec::Png),
    );
    let output = compress_image(&input, &CompressionOptions::default()).unwrap();

    assert_eq!(output.format, ImageFormat::Jpeg);
    assert_eq!(ImageFormat::sniff(&output.bytes), Some(ImageFormat::Jpeg));
    assert_eq!(dimensions(&output), (32, 32));
}

#[tokio::test]
async fn test_compress_all_preserves_input_order() {
    let files = vec![
        SelectedFile::new("wide.png", ImageFormat::Png, encode(gradient(2400, 600), Codec::Png)),
        SelectedFile::new("tiny.png", ImageFormat::Png, encode(gradient(8, 8), Codec::Png)),
        SelectedFile::new("tall.jpg", ImageFormat::Jpeg, encode(gradient(500, 2500), Codec::Jpeg)),
    ];

    let mut reported = Vec::new();
    let output = compress_all(&files, &CompressionOptions::default(), |done, total| {
        reported.push((done, total))
    })
    .await
    .unwrap();

    let names: Vec<_> = output.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["wide.png", "tiny.png", "tall.jpg"]);
    assert_eq!(dimensions(&output[0]), (1920, 480));
    assert_eq!(dimensions(&output[1]), (8, 8));
    assert_eq!(dimensions(&output[2]), (384, 1920));
    assert_eq!(reported.last(), Some(&(3, 3)));
    assert_eq!(reported.len(), 3);
}

#[tokio::test]
async fn test_compress_all_inline_matches_worker() {
    let files = vec![
        SelectedFile::new("a.png", ImageFormat::Png, encode(gradient(40, 20), Codec::Png)),
        SelectedFile::new("b.png", ImageFormat::Png, encode(gradient(20, 40), Codec::Png)),
    ];
    let inline = CompressionOptions {
        use_worker: false,
        ..Default::default()
    };

    let a = compress_all(&files, &inline, |_, _| {}).await.unwrap();
    let b = compress_all(&files, &CompressionOptions::default(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(a, b);
}

#[tokio::test]
async fn test_compress_all_fails_when_any_file_fails() {
    let files = vec![
        SelectedFile::new("ok.png", ImageFormat::Png, encode(gradient(10, 10), Codec::Png)),
        SelectedFile::new("broken.jpg", ImageFormat::Jpeg, vec![0xFF, 0xD8, 0xFF]),
    ];

    let result = compress_all(&files, &CompressionOptions::default(), |_, _| {}).await;
    match result {
        Err(ConvertError::Compression { name, .. }) => assert_eq!(name, "broken.jpg"),
        _ => panic!("Expected Compression error"),
    }
}
