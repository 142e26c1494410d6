//! Optional compression step applied before rendering

use crate::options::CompressionOptions;
use crate::types::*;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbImage};
use std::io::Cursor;
use tokio::task::JoinSet;

/// Each attempt shrinks both edges by this factor once quality bottoms out
const SHRINK_FACTOR: f32 = 0.9;
const MAX_SHRINK_ATTEMPTS: usize = 12;

/// Compress a single file to fit the size and dimension limits.
///
/// The output is always JPEG; transparent PNG areas are flattened onto white,
/// which is also what a PDF page shows behind them. A JPEG already within
/// both limits is returned unchanged.
pub fn compress_image(file: &SelectedFile, options: &CompressionOptions) -> Result<SelectedFile> {
    let fail = |reason: String| ConvertError::Compression {
        name: file.name.clone(),
        reason,
    };

    let img = image::load_from_memory_with_format(&file.bytes, file.format.to_image_format())
        .map_err(|e| fail(e.to_string()))?;
    let (width, height) = img.dimensions();

    if file.format == ImageFormat::Jpeg
        && width.max(height) <= options.max_dimension_px
        && file.size() <= options.max_size_bytes
    {
        log::debug!("{} already within limits, keeping original", file.name);
        return Ok(file.clone());
    }

    let img = if width.max(height) > options.max_dimension_px {
        let (w, h) = fit_longest_edge(width, height, options.max_dimension_px);
        log::debug!("Resizing {} {}x{} -> {}x{}", file.name, width, height, w, h);
        img.resize_exact(w, h, FilterType::Lanczos3)
    } else {
        img
    };

    let mut rgb = flatten_onto_white(&img);

    for _ in 0..MAX_SHRINK_ATTEMPTS {
        let mut quality = options.initial_quality;
        loop {
            let bytes = encode_jpeg(&rgb, quality).map_err(|e| fail(e.to_string()))?;
            if bytes.len() <= options.max_size_bytes {
                log::debug!(
                    "Compressed {}: {} -> {} bytes ({}x{}, q={})",
                    file.name,
                    file.size(),
                    bytes.len(),
                    rgb.width(),
                    rgb.height(),
                    quality
                );
                return Ok(SelectedFile::new(file.name.clone(), ImageFormat::Jpeg, bytes));
            }
            if quality <= options.min_quality {
                break;
            }
            quality = quality
                .saturating_sub(options.quality_step)
                .max(options.min_quality);
        }

        let (w, h) = rgb.dimensions();
        if w <= 1 && h <= 1 {
            break;
        }
        let new_w = ((w as f32 * SHRINK_FACTOR) as u32).max(1);
        let new_h = ((h as f32 * SHRINK_FACTOR) as u32).max(1);
        rgb = image::imageops::resize(&rgb, new_w, new_h, FilterType::Triangle);
    }

    Err(fail(format!(
        "could not reach {} bytes",
        options.max_size_bytes
    )))
}

/// Compress every file. Files are processed concurrently but the result is
/// index-aligned with the input; any failure fails the whole batch.
pub async fn compress_all<F>(
    files: &[SelectedFile],
    options: &CompressionOptions,
    mut on_progress: F,
) -> Result<Vec<SelectedFile>>
where
    F: FnMut(usize, usize),
{
    let total = files.len();

    if !options.use_worker {
        let mut compressed = Vec::with_capacity(total);
        for (index, file) in files.iter().enumerate() {
            compressed.push(compress_image(file, options)?);
            on_progress(index + 1, total);
            tokio::task::yield_now().await;
        }
        return Ok(compressed);
    }

    let mut tasks = JoinSet::new();
    for (index, file) in files.iter().cloned().enumerate() {
        let options = options.clone();
        tasks.spawn_blocking(move || (index, compress_image(&file, &options)));
    }

    let mut slots: Vec<Option<SelectedFile>> = vec![None; total];
    let mut done = 0;
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        slots[index] = Some(result?);
        done += 1;
        on_progress(done, total);
    }

    slots
        .into_iter()
        .zip(files)
        .map(|(slot, file)| {
            slot.ok_or_else(|| ConvertError::Compression {
                name: file.name.clone(),
                reason: "no result produced".to_string(),
            })
        })
        .collect()
}

/// Scale so the longest edge equals `max_edge`, keeping aspect ratio
pub fn fit_longest_edge(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_edge {
        return (width, height);
    }
    let scale = max_edge as f64 / longest as f64;
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_edge);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_edge);
    (w, h)
}

pub(crate) fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

fn encode_jpeg(img: &RgbImage, quality: u8) -> std::result::Result<Vec<u8>, image::ImageError> {
    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    img.write_with_encoder(encoder)?;
    Ok(buf.into_inner())
}
