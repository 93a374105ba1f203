use std::ffi::c_void;
use std::fmt;

use crate::dlpack::{DLDeviceType, TensorMeta};

// Stream environment
//
// The host (an FFI runtime, a Python framework, a test) owns the mapping from
// device to its current execution stream. This module only forwards a
// tensor's device fields to that query; it never creates, syncs or destroys
// a stream.

/// Opaque stream token handed out by the host environment.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle(*mut c_void);

impl StreamHandle {
    pub const fn from_raw(raw: *mut c_void) -> Self {
        StreamHandle(raw)
    }

    pub const fn as_raw(&self) -> *mut c_void {
        self.0
    }

    /// The null stream (legacy default stream on CUDA).
    pub const fn null() -> Self {
        StreamHandle(std::ptr::null_mut())
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StreamHandle({:p})", self.0)
    }
}

// Safety: the handle is an opaque token owned by the host and never
// dereferenced here.
unsafe impl Send for StreamHandle {}
unsafe impl Sync for StreamHandle {}

/// Host-side query for the current stream of a device.
pub trait StreamEnv {
    fn stream(&self, device_type: DLDeviceType, device_id: i32) -> StreamHandle;
}

impl<F> StreamEnv for F
where
    F: Fn(DLDeviceType, i32) -> StreamHandle,
{
    fn stream(&self, device_type: DLDeviceType, device_id: i32) -> StreamHandle {
        self(device_type, device_id)
    }
}

/// Current stream of the device `tensor` lives on.
pub fn get_stream<E, M>(env: &E, tensor: &M) -> StreamHandle
where
    E: StreamEnv + ?Sized,
    M: TensorMeta + ?Sized,
{
    let device = tensor.device();
    let stream = env.stream(device.device_type, device.device_id);
    log::trace!("stream for {device}: {stream:?}");
    stream
}

#[cfg(feature = "tvm-ffi")]
mod tvm_ffi {
    use super::{StreamEnv, StreamHandle};
    use crate::dlpack::DLDeviceType;
    use std::ffi::c_void;

    extern "C" {
        fn TVMFFIEnvGetStream(device_type: i32, device_id: i32) -> *mut c_void;
    }

    /// Streams from the TVM FFI environment the library is loaded into.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct TvmFfiEnv;

    impl StreamEnv for TvmFfiEnv {
        fn stream(&self, device_type: DLDeviceType, device_id: i32) -> StreamHandle {
            // Safety: plain lookup with no pointer arguments; the host keeps
            // the returned stream alive for the duration of the call.
            StreamHandle::from_raw(unsafe { TVMFFIEnvGetStream(device_type as i32, device_id) })
        }
    }
}

#[cfg(feature = "tvm-ffi")]
pub use tvm_ffi::TvmFfiEnv;
