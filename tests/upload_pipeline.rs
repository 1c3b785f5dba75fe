//! End-to-end uploads through the public API with the real `image` backend.

use gallery_ingest::config::IngestConfig;
use gallery_ingest::imaging::{Bounds, ImageProcessor, ProcessError, Quality, RustBackend};
use gallery_ingest::incoming::IncomingFile;
use gallery_ingest::naming::{Namer, TokenSource};
use gallery_ingest::store::PictureStore;
use gallery_ingest::upload::{UploadError, Uploader};
use image::{ImageEncoder, RgbImage};
use std::path::Path;
use tempfile::TempDir;

struct Token(&'static str);

impl TokenSource for Token {
    fn next_token(&self) -> String {
        self.0.to_string()
    }
}

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    });
    let file = std::fs::File::create(path).unwrap();
    image::codecs::jpeg::JpegEncoder::new(std::io::BufWriter::new(file))
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

fn entries(dir: &Path) -> Vec<String> {
    let Ok(read) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = read
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn uploader_with_token(store: &Path, token: &'static str) -> Uploader<RustBackend, Token> {
    Uploader::new(
        PictureStore::new(store),
        Namer::new(Token(token)),
        ImageProcessor::with_quality(Quality::default()),
        Bounds::DISPLAY,
        Bounds::THUMBNAIL,
    )
}

#[test]
fn sunset_upload_produces_display_and_thumbnail() {
    let tmp = TempDir::new().unwrap();
    let incoming = tmp.path().join("php-upload-1234");
    let store = tmp.path().join("pictures");
    write_jpeg(&incoming, 1600, 1200);

    let uploader = uploader_with_token(&store, "abc123");
    let outcome = uploader
        .upload(&IncomingFile::new(&incoming, "Sunset.jpg"), "My Sunset")
        .unwrap();

    assert!(!outcome.failed);
    assert_eq!(outcome.stored_file_name, "sunset-abc123.jpg");
    assert_eq!(outcome.thumb_file_name, "sunset-abc123-thumb.jpg");
    assert_eq!(outcome.slug_name, "my-sunset-abc123");

    let display = image::image_dimensions(store.join("sunset-abc123.jpg")).unwrap();
    let thumb = image::image_dimensions(store.join("sunset-abc123-thumb.jpg")).unwrap();
    assert_eq!(display, (1000, 750));
    assert_eq!(thumb, (200, 150));
    assert_eq!(entries(&store).len(), 2);
    assert!(!incoming.exists());
}

#[test]
fn text_renamed_to_jpg_fails_and_leaves_store_empty() {
    let tmp = TempDir::new().unwrap();
    let incoming = tmp.path().join("upload");
    let store = tmp.path().join("pictures");
    std::fs::write(&incoming, "this is not a picture").unwrap();

    let uploader = uploader_with_token(&store, "t1");
    let outcome = uploader
        .upload(&IncomingFile::new(&incoming, "notes.jpg"), "Notes")
        .unwrap();

    assert!(outcome.failed);
    assert!(matches!(
        outcome.failure.as_ref().unwrap().error,
        UploadError::Process(ProcessError::Decode(_))
    ));
    assert!(entries(&store).is_empty());
    assert!(outcome.record("Notes").is_none());
}

#[test]
fn empty_display_name_slug_is_the_token() {
    let tmp = TempDir::new().unwrap();
    let incoming = tmp.path().join("upload");
    write_jpeg(&incoming, 40, 30);

    let uploader = uploader_with_token(&tmp.path().join("pictures"), "0192f1c4");
    let outcome = uploader
        .upload(&IncomingFile::new(&incoming, "Sunset.jpg"), "")
        .unwrap();

    assert!(!outcome.failed);
    assert_eq!(outcome.slug_name, "0192f1c4");
}

#[test]
fn repeated_uploads_of_the_same_file_get_distinct_names() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("Sunset.jpg");
    let store = tmp.path().join("pictures");
    write_jpeg(&source, 64, 48);

    let config = IngestConfig {
        target_dir: store.clone(),
        ..IngestConfig::default()
    };
    let uploader = Uploader::from_config(&config);
    let file = IncomingFile::from_path(&source).keep_source();

    let a = uploader.upload(&file, "My Sunset").unwrap();
    let b = uploader.upload(&file, "My Sunset").unwrap();

    assert!(!a.failed && !b.failed);
    assert_ne!(a.stored_file_name, b.stored_file_name);
    assert_ne!(a.thumb_file_name, b.thumb_file_name);
    assert_ne!(a.slug_name, b.slug_name);
    assert_eq!(entries(&store).len(), 4);
    assert!(source.exists());
}

#[test]
fn png_upload_keeps_png_format() {
    let tmp = TempDir::new().unwrap();
    let incoming = tmp.path().join("upload");
    RgbImage::new(500, 500)
        .save_with_format(&incoming, image::ImageFormat::Png)
        .unwrap();

    let store = tmp.path().join("pictures");
    let outcome = uploader_with_token(&store, "p1")
        .upload(&IncomingFile::new(&incoming, "Square.png"), "Square")
        .unwrap();

    assert!(!outcome.failed);
    assert_eq!(outcome.stored_file_name, "square-p1.png");
    let thumb = store.join("square-p1-thumb.png");
    assert_eq!(image::image_dimensions(&thumb).unwrap(), (150, 150));
    assert_eq!(
        image::ImageReader::open(&thumb)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .format(),
        Some(image::ImageFormat::Png)
    );
}

#[test]
fn removing_a_picture_deletes_both_files() {
    let tmp = TempDir::new().unwrap();
    let incoming = tmp.path().join("upload");
    let store_dir = tmp.path().join("pictures");
    write_jpeg(&incoming, 80, 60);

    let uploader = uploader_with_token(&store_dir, "r1");
    let outcome = uploader
        .upload(&IncomingFile::new(&incoming, "Dawn.jpg"), "Dawn")
        .unwrap();
    assert_eq!(entries(&store_dir).len(), 2);

    uploader
        .store()
        .remove_picture(&outcome.stored_file_name, &outcome.thumb_file_name)
        .unwrap();

    assert!(entries(&store_dir).is_empty());
}
