use std::path::PathBuf;
use std::process::Command;

use watermark::{EncodeOptions, PixelBuffer, read_image, write_image};

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_watermark")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "watermark.exe"
            } else {
                "watermark"
            });
            p
        })
}

fn fixtures(name: &str) -> (PathBuf, PathBuf, PathBuf) {
    let dir = PathBuf::from("target").join("cli_smoke").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let main = dir.join("main.png");
    let mark = dir.join("mark.png");
    write_image(
        &main,
        &PixelBuffer::filled(8, 8, [255, 0, 0, 255]).unwrap(),
        EncodeOptions::default(),
    )
    .unwrap();
    write_image(
        &mark,
        &PixelBuffer::filled(2, 2, [0, 255, 0, 255]).unwrap(),
        EncodeOptions::default(),
    )
    .unwrap();
    (main, mark, dir)
}

#[test]
fn cli_writes_watermarked_png_silently() {
    let (main, mark, dir) = fixtures("flags");
    let out = dir.join("out.png");

    let output = Command::new(exe())
        .arg("-m")
        .arg(&main)
        .arg("-w")
        .arg(&mark)
        .arg("-o")
        .arg(&out)
        .args(["-x", "3", "-y", "4", "--height", "2", "--width", "2"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let img = read_image(&out).unwrap();
    assert_eq!(img.pixel(3, 4), [0, 255, 0, 255]);
    assert_eq!(img.pixel(4, 5), [0, 255, 0, 255]);
    assert_eq!(img.pixel(2, 4), [255, 0, 0, 255]);
}

#[test]
fn cli_missing_paths_is_usage_error() {
    let (main, _, _) = fixtures("missing");
    let output = Command::new(exe()).arg("-m").arg(&main).output().unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid usage"));
}

#[test]
fn cli_negative_offset_fails_with_message() {
    let (main, mark, dir) = fixtures("negative");
    let out = dir.join("out.png");

    let output = Command::new(exe())
        .arg("-m")
        .arg(&main)
        .arg("-w")
        .arg(&mark)
        .arg("-o")
        .arg(&out)
        .args(["-x", "-1", "--height", "2", "--width", "2"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("out of bounds"));
    assert!(!out.exists());
}

#[test]
fn cli_job_file_with_flag_override() {
    let (main, mark, dir) = fixtures("job");
    let out = dir.join("out.png");
    let job_path = dir.join("job.json");

    let job = serde_json::json!({
        "main_image": main,
        "watermark_image": mark,
        "out": dir.join("ignored.png"),
        "x": 0,
        "y": 0,
        "bound_height": 2,
        "bound_width": 2,
    });
    std::fs::write(&job_path, serde_json::to_vec_pretty(&job).unwrap()).unwrap();

    let status = Command::new(exe())
        .arg("--job")
        .arg(&job_path)
        .arg("-o")
        .arg(&out)
        .args(["-x", "6"])
        .status()
        .unwrap();

    assert!(status.success());
    assert!(!dir.join("ignored.png").exists());
    let img = read_image(&out).unwrap();
    assert_eq!(img.pixel(6, 0), [0, 255, 0, 255]);
    assert_eq!(img.pixel(0, 0), [255, 0, 0, 255]);
}
