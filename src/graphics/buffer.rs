//! Buffers are a region of mapped memory.
//!
//! Device-local buffers require uploading their data to the GPU, the helpers here build the
//! intermediate staging buffer, record the copy and wait for it to finish.

use super::device::Device;

use std::sync::Arc;

use vulkano::memory::DeviceMemoryAllocError;
use vulkano::sync::{FlushError, GpuFuture};

pub use vulkano::buffer::{BufferAccess, BufferUsage, ImmutableBuffer, TypedBufferAccess};

/// Error during upload of buffer data.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
	/// Not enough memory for the staging or the destination buffer.
	#[error("failed to allocate buffer memory: {0}")]
	Allocation(#[from] DeviceMemoryAllocError),
	/// The copy command could not be submitted or waited on.
	#[error("failed to flush buffer upload: {0}")]
	Flush(#[from] FlushError),
}

/// Create a device-local immutable buffer from some data iterator.
///
/// Builds an intermediate memory-mapped buffer, writes data to it, builds a copy (upload) command buffer and waits for its execution.
pub fn create_immutable_buffer_from_iter<T, I>(device: &Device, data_iterator: I, usage: BufferUsage) -> Result<Arc<ImmutableBuffer<[T]>>, UploadError>
where
	T : Send + Sync + Sized + 'static,
	I : ExactSizeIterator<Item = T>,
{
	let (buffer, future) = ImmutableBuffer::from_iter(data_iterator, usage, device.graphics_queue().clone())?;

	// TODO: join uploads into the next frame instead of blocking, once models are loaded during play
	future.then_signal_fence_and_flush()?.wait(None)?;

	Ok(buffer)
}
