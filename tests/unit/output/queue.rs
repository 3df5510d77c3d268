use super::*;
use crate::output::codec::ImageCodec;
use crate::pixels::buffer::{Payload, PixelBuffer, PixelType};

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_queue").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn task(path: PathBuf) -> ImageWriteTask {
    let buf = PixelBuffer::solid(PixelType::Color8, 4, 4, [0.2, 0.4, 0.6, 1.0], Payload::default());
    ImageWriteTask::new(path, ImageCodec::Png, buf)
}

#[test]
fn ready_future_resolves_immediately() {
    let mut f = WriteFuture::ready(Ok(PathBuf::from("/x.png")));
    assert!(f.is_ready());
    assert_eq!(f.wait().unwrap(), PathBuf::from("/x.png"));
}

#[test]
fn dropped_promise_reports_codec_error() {
    let (promise, future) = WriteFuture::pending();
    drop(promise);
    assert!(matches!(future.wait(), Err(AnnotateError::Codec(_))));
}

#[test]
fn zero_threads_or_bound_is_rejected() {
    assert!(ThreadedImageWriteQueue::new(Some(0), 4).is_err());
    assert!(ThreadedImageWriteQueue::new(Some(1), 0).is_err());
}

#[test]
fn threaded_queue_writes_every_task_and_flushes() {
    let dir = scratch("many");
    let q = ThreadedImageWriteQueue::new(Some(2), 2).unwrap();
    let futures: Vec<_> = (0..6)
        .map(|i| q.enqueue(task(dir.join(format!("{i:04}.png")))))
        .collect();
    q.flush();
    assert_eq!(q.in_flight(), 0);
    for (i, f) in futures.into_iter().enumerate() {
        let p = f.wait().unwrap();
        assert!(p.ends_with(format!("{i:04}.png")));
        assert!(p.exists());
    }
}

#[test]
fn failed_write_resolves_future_with_error() {
    let dir = scratch("fail");
    std::fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("file");
    std::fs::write(&blocker, b"x").unwrap();
    let q = ThreadedImageWriteQueue::new(Some(1), 1).unwrap();
    let f = q.enqueue(task(blocker.join("sub").join("0000.png")));
    assert!(f.wait().is_err());
}
