//! Image write tasks, the asynchronous write queue, and the render-pass fan-out.

pub(crate) mod codec;
pub(crate) mod encode;
pub(crate) mod fanout;
pub(crate) mod queue;
pub(crate) mod task;

pub use codec::ImageCodec;
pub use encode::{encode_to_file, run_write_task};
pub use fanout::{PassState, RenderPassFanout};
pub use queue::{
    DEFAULT_MAX_IN_FLIGHT, ImageWriteQueue, ThreadedImageWriteQueue, WriteFuture, WritePromise,
};
pub use task::ImageWriteTask;
