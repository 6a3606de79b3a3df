use std::io::Cursor;

use super::*;

fn png(px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "genvas_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn bytes_are_decoded_once_and_cached() {
    let mut store = AssetStore::default();
    let src = AssetSource::bytes(png([255, 0, 0, 255]));
    let a = store.load_image(&src).unwrap();
    let b = store.load_image(&src).unwrap();
    assert_eq!(store.cached_len(), 1);
    assert!(Arc::ptr_eq(&a.rgba8_premul, &b.rgba8_premul));
    assert_eq!((a.width, a.height), (2, 2));
}

#[test]
fn key_depends_on_source_kind() {
    let bytes = AssetSource::bytes(b"x".to_vec());
    let remote = AssetSource::Remote("x".into());
    assert_ne!(AssetStore::key_for(&bytes), AssetStore::key_for(&remote));
}

#[test]
fn relative_files_resolve_against_root() {
    let tmp = temp_dir("store_files");
    std::fs::create_dir_all(tmp.join("img")).unwrap();
    std::fs::write(tmp.join("img/a.png"), png([0, 255, 0, 255])).unwrap();

    let mut store = AssetStore::new(&tmp);
    let img = store
        .load_image(&AssetSource::File("img/a.png".into()))
        .unwrap();
    assert_eq!(img.width, 2);
    assert!(
        store
            .load_image(&AssetSource::File("img/missing.png".into()))
            .is_err()
    );
    assert!(
        store
            .load_image(&AssetSource::File("../escape.png".into()))
            .is_err()
    );

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn remote_sources_cannot_be_rasterized() {
    let mut store = AssetStore::default();
    let err = store
        .load_image(&AssetSource::Remote("https://example.invalid/v.mp4".into()))
        .unwrap_err();
    assert!(matches!(err, CanvasError::Decode(_)));
}
