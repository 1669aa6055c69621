use std::path::PathBuf;

const FONT: &str = "tests/data/fonts/DejaVuSans.ttf";

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_thumbnail")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "thumbnail.exe"
            } else {
                "thumbnail"
            });
            p
        })
}

fn write_png(path: &std::path::Path, w: u32, h: u32) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([30, 60, 90, 255]));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

#[test]
fn cli_generate_writes_pngs() {
    let dir = PathBuf::from("target").join("cli_smoke_generate");
    let images = dir.join("images");
    let output = dir.join("out");
    std::fs::create_dir_all(&images).unwrap();
    std::fs::create_dir_all(&output).unwrap();
    let _ = std::fs::remove_file(output.join("image_0.png"));
    let _ = std::fs::remove_file(output.join("image_1.png"));

    write_png(&images.join("bg.png"), 160, 90);
    let sentences = dir.join("sentences.txt");
    std::fs::write(&sentences, "first\nsecond\\nline\n").unwrap();

    let status = std::process::Command::new(exe())
        .arg("generate")
        .arg("--images")
        .arg(&images)
        .arg("--sentences")
        .arg(&sentences)
        .args(["--font", FONT, "--seed", "3"])
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();

    assert!(status.success());
    assert!(output.join("image_0.png").exists());
    assert!(output.join("image_1.png").exists());
}

#[test]
fn cli_caption_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke_caption");
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("in.png");
    let out = dir.join("out.png");
    let _ = std::fs::remove_file(&out);
    write_png(&input, 2000, 1000);

    let status = std::process::Command::new(exe())
        .arg("caption")
        .arg("--image")
        .arg(&input)
        .args(["--text", "Hello\\nthere", "--font", FONT, "--no-border"])
        .arg("--out")
        .arg(&out)
        .status()
        .unwrap();

    assert!(status.success());
    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (1200, 600));
}

#[test]
fn cli_reports_missing_sentence_file() {
    let dir = PathBuf::from("target").join("cli_smoke_missing");
    std::fs::create_dir_all(dir.join("images")).unwrap();

    let status = std::process::Command::new(exe())
        .arg("generate")
        .arg("--images")
        .arg(dir.join("images"))
        .arg("--sentences")
        .arg(dir.join("nope.txt"))
        .args(["--font", FONT])
        .arg("--output")
        .arg(&dir)
        .status()
        .unwrap();

    assert!(!status.success());
}
