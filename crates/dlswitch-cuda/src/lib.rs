// CUDA helpers — driver status checks and stream handles via cudarc
//
// Kernel wrappers built on dlswitch-core need two CUDA-specific pieces:
//
// - CudaStatus adapts a driver `CUresult` to dlswitch-core's DeviceStatus, so
//   `check_cuda_success!` fails with the driver's own error string.
// - cuda_stream turns the host environment's opaque stream handle for a
//   tensor's device into a `CUstream` ready for a kernel launch.
//
// cudarc is built with dynamic loading: nothing touches libcuda until a
// non-success status is described. Without a driver the description falls
// back to the CUresult name, so both paths work on hosts without CUDA.
//
// USAGE:
//   check_cuda_success!(unsafe { sys::cuCtxSynchronize() });
//   let stream = cuda_stream(&env, &tensor);

use std::fmt;
use std::panic;

use cudarc::driver::sys;
use cudarc::driver::DriverError;

use dlswitch_core::check::{status_to_result, DeviceStatus};
use dlswitch_core::env::{get_stream, StreamEnv};
use dlswitch_core::error::{Error, Result};
use dlswitch_core::TensorMeta;

pub use cudarc::driver::sys::{CUresult, CUstream};
pub use dlswitch_core;

// CudaStatus — CUresult as a DeviceStatus

/// A CUDA driver status code.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CudaStatus(pub CUresult);

impl CudaStatus {
    pub const SUCCESS: CudaStatus = CudaStatus(CUresult::CUDA_SUCCESS);
}

impl From<CUresult> for CudaStatus {
    fn from(status: CUresult) -> Self {
        CudaStatus(status)
    }
}

impl From<DriverError> for CudaStatus {
    fn from(err: DriverError) -> Self {
        CudaStatus(err.0)
    }
}

impl fmt::Debug for CudaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl DeviceStatus for CudaStatus {
    fn is_success(&self) -> bool {
        self.0 == CUresult::CUDA_SUCCESS
    }

    fn description(&self) -> String {
        let code = self.0;
        // cudarc's loader panics when libcuda is missing; the code's name
        // stands in for the driver message then.
        let described = panic::catch_unwind(|| {
            DriverError(code)
                .error_string()
                .map(|msg| msg.to_string_lossy().into_owned())
        });
        match described {
            Ok(Ok(msg)) => msg,
            _ => format!("{code:?}"),
        }
    }
}

/// `Ok(())` on `CUDA_SUCCESS`, `Error::DeviceRuntime` otherwise.
pub fn cuda_result(status: impl Into<CudaStatus>) -> Result<()> {
    let status = status.into();
    let res = status_to_result(status);
    if res.is_err() {
        log::error!("CUDA call returned {status:?}");
    }
    res
}

/// Convert a cudarc driver error into a dlswitch error.
pub fn driver_error(err: DriverError) -> Error {
    Error::DeviceRuntime {
        message: CudaStatus::from(err).description(),
    }
}

/// Panic with `"CUDA Failure: <driver message>"` unless the status is
/// `CUDA_SUCCESS`.
#[macro_export]
macro_rules! check_cuda_success {
    ($status:expr) => {
        $crate::dlswitch_core::check_success!($crate::CudaStatus::from($status))
    };
}

// Streams

/// The host environment's current stream for `tensor`'s device, as a
/// `CUstream`.
pub fn cuda_stream<E, M>(env: &E, tensor: &M) -> CUstream
where
    E: StreamEnv + ?Sized,
    M: TensorMeta + ?Sized,
{
    get_stream(env, tensor).as_raw() as sys::CUstream
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert!(CudaStatus::SUCCESS.is_success());
        assert!(!CudaStatus(CUresult::CUDA_ERROR_INVALID_VALUE).is_success());
        assert!(cuda_result(CUresult::CUDA_SUCCESS).is_ok());
    }

    #[test]
    fn test_success_check_is_noop() {
        check_cuda_success!(CUresult::CUDA_SUCCESS);
    }

    #[test]
    fn test_status_debug() {
        let s = format!("{:?}", CudaStatus(CUresult::CUDA_ERROR_OUT_OF_MEMORY));
        assert_eq!(s, "CUDA_ERROR_OUT_OF_MEMORY");
    }
}
