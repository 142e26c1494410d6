use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use std::process::Command;

fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    DynamicImage::new_rgb8(width, height)
        .save_with_format(&path, ImageFormat::Jpeg)
        .unwrap();
    path
}

fn img2pdf() -> Command {
    Command::new(env!("CARGO_BIN_EXE_img2pdf"))
}

#[test]
fn test_convert_writes_converted_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = [
        write_jpeg(dir.path(), "a.jpg", 80, 60),
        write_jpeg(dir.path(), "b.jpg", 100, 50),
    ];

    let output = img2pdf()
        .arg("convert")
        .args(&inputs)
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let pdf = std::fs::read(dir.path().join("converted.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("2 pages"));
}

#[test]
fn test_convert_with_compression() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_jpeg(dir.path(), "big.jpg", 2200, 1000);

    let output = img2pdf()
        .arg("convert")
        .arg(&input)
        .arg("--compress")
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--output-name")
        .arg("small.pdf")
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("small.pdf").exists());
}

#[test]
fn test_too_many_files_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let inputs: Vec<_> = (0..3)
        .map(|i| write_jpeg(dir.path(), &format!("{i}.jpg"), 4, 4))
        .collect();

    let output = img2pdf()
        .arg("convert")
        .args(&inputs)
        .arg("--max-files")
        .arg("2")
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("at most 2 images"));
    assert!(!dir.path().join("converted.pdf").exists());
}

#[test]
fn test_limit_checked_before_files_are_read() {
    let dir = tempfile::tempdir().unwrap();
    let inputs: Vec<_> = (0..21)
        .map(|i| dir.path().join(format!("missing-{i}.jpg")))
        .collect();

    let output = img2pdf()
        .arg("convert")
        .args(&inputs)
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("at most 20 images (21 selected)"), "{stderr}");
}

#[test]
fn test_config_round_trip_through_cli() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("options.json");

    let status = img2pdf()
        .arg("config")
        .arg("--output")
        .arg(&config)
        .arg("--compress")
        .status()
        .unwrap();
    assert!(status.success());

    let json = std::fs::read_to_string(&config).unwrap();
    assert!(json.contains("\"max_files\": 20"));
    assert!(json.contains("\"max_dimension_px\": 1920"));

    let input = write_jpeg(dir.path(), "a.jpg", 10, 10);
    let status = img2pdf()
        .arg("convert")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("--output-dir")
        .arg(dir.path())
        .status()
        .unwrap();
    assert!(status.success());
    assert!(dir.path().join("converted.pdf").exists());
}
