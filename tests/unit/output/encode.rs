use super::*;
use crate::pixels::buffer::{Payload, PixelType, Plane};
use crate::pixels::composite::PixelPreProcessor;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_encode").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn png_round_trips_rgba8() {
    let dir = scratch("png");
    let px = vec![[255u8, 0, 0, 255], [0, 255, 0, 128], [0, 0, 255, 0], [10, 20, 30, 40]];
    let buf = PixelBuffer::new(PixelData::Color8(Plane::new(2, 2, px.clone()).unwrap()), Payload::default());
    let path = dir.join("a").join("img.png");
    run_write_task(ImageWriteTask::new(&path, ImageCodec::Png, buf)).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    let got: Vec<[u8; 4]> = decoded.pixels().map(|p| p.0).collect();
    assert_eq!(got, px);
}

#[test]
fn exr_keeps_float_values() {
    let dir = scratch("exr");
    let px = vec![[0.125f32, 1.5, -2.0, 1.0], [3.25, 0.0, 0.5, 0.25]];
    let buf = PixelBuffer::new(PixelData::Float32(Plane::new(2, 1, px.clone()).unwrap()), Payload::default());
    let path = dir.join("img.exr");
    run_write_task(ImageWriteTask::new(&path, ImageCodec::Exr, buf)).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba32f();
    let got: Vec<[f32; 4]> = decoded.pixels().map(|p| p.0).collect();
    assert_eq!(got, px);
}

#[test]
fn jpeg_drops_alpha_and_writes() {
    let dir = scratch("jpeg");
    let buf = PixelBuffer::solid(PixelType::Color8, 8, 8, [0.5, 0.5, 0.5, 0.0], Payload::default());
    let path = dir.join("img.jpeg");
    run_write_task(ImageWriteTask::new(&path, ImageCodec::Jpeg, buf)).unwrap();
    let decoded = image::open(&path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 8));
}

#[test]
fn eight_bit_codec_rejects_float_pixels() {
    let dir = scratch("reject");
    let buf = PixelBuffer::solid(PixelType::Float16, 2, 2, [0.0; 4], Payload::default());
    let err = run_write_task(ImageWriteTask::new(dir.join("x.bmp"), ImageCodec::Bmp, buf)).unwrap_err();
    assert!(matches!(err, AnnotateError::Codec(_)));
}

#[test]
fn pre_processors_run_before_encoding() {
    let dir = scratch("composite");
    let overlay = PixelBuffer::solid(PixelType::Color8, 2, 2, [1.0, 1.0, 1.0, 1.0], Payload::default());
    let target = PixelBuffer::solid(PixelType::Color8, 2, 2, [0.0, 0.0, 0.0, 1.0], Payload::default());
    let mut task = ImageWriteTask::new(dir.join("c.png"), ImageCodec::Png, target);
    task.pre_processors.push(PixelPreProcessor::composite_for(PixelType::Color8, &overlay));
    let path = run_write_task(task).unwrap();
    let decoded = image::open(&path).unwrap().to_rgba8();
    assert!(decoded.pixels().all(|p| p.0 == [255, 255, 255, 255]));
}
