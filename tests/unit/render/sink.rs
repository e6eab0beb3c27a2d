use super::*;
use crate::foundation::core::Surface;
use crate::render::raster::{BACKGROUND, FrameRgb8};

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        device: DeviceType::Gl,
    }
}

fn frame(width: u32, height: u32) -> FrameRgb8 {
    FrameRgb8::try_new(Surface::new(width, height).unwrap(), BACKGROUND).unwrap()
}

fn temp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("canopy_sink_{tag}_{}", std::process::id()))
}

#[test]
fn in_memory_sink_captures_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(0, &frame(2, 2)).unwrap();
    sink.push_frame(1, &frame(2, 2)).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, 1);
    assert_eq!(sink.config().unwrap().width, 2);
}

#[test]
fn push_before_begin_or_with_wrong_size_fails() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(0, &frame(2, 2)).is_err());
    sink.begin(cfg(2, 2)).unwrap();
    let err = sink.push_frame(0, &frame(3, 2)).unwrap_err();
    assert!(err.to_string().starts_with("output error:"));
}

#[test]
fn null_sink_counts() {
    let mut sink = NullSink::new();
    sink.begin(cfg(1, 1)).unwrap();
    sink.push_frame(0, &frame(1, 1)).unwrap();
    assert_eq!(sink.pushed(), 1);
}

#[test]
fn ppm_sink_writes_binary_pixmap() {
    let dir = temp_dir("ppm");
    let _ = std::fs::remove_dir_all(&dir);
    let mut sink = PpmFileSink::new(&dir);
    sink.begin(cfg(3, 2)).unwrap();
    sink.push_frame(7, &frame(3, 2)).unwrap();
    sink.end().unwrap();

    let bytes = std::fs::read(dir.join("frame_7.ppm")).unwrap();
    assert!(bytes.starts_with(b"P6"));
    assert_eq!(&bytes[bytes.len() - 18..], [24u8; 18].as_slice());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn png_sink_round_trips_through_image() {
    let dir = temp_dir("png");
    let mut sink = PngFileSink::new(&dir);
    sink.begin(cfg(4, 4)).unwrap();
    sink.push_frame(0, &frame(4, 4)).unwrap();
    let img = image::open(sink.frame_path(0)).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (4, 4));
    assert_eq!(img.get_pixel(3, 3).0, [24, 24, 24]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn boxed_sinks_forward() {
    let mut sink: Box<dyn FrameSink> = Box::new(NullSink::new());
    sink.begin(cfg(1, 1)).unwrap();
    sink.push_frame(0, &frame(1, 1)).unwrap();
    sink.end().unwrap();
}
