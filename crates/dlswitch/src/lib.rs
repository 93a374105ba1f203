//! # dlswitch
//!
//! Map DLPack element-type descriptors to concrete Rust types at the
//! boundary between a tensor-exchange runtime and typed kernels.
//!
//! This is the facade crate that re-exports everything you need.
//!
//! ## Usage
//!
//! ```rust
//! use dlswitch::prelude::*;
//!
//! struct ByteWidth;
//!
//! impl ElementOp for ByteWidth {
//!     type Output = usize;
//!     fn run<T: DLElement>(self) -> usize {
//!         std::mem::size_of::<T>()
//!     }
//! }
//!
//! let bf16 = DLDataType::scalar(DLDataTypeCode::Bfloat, 16);
//! assert_eq!(dispatch::<FloatTable, _>("doc", bf16, ByteWidth), 2);
//! ```
//!
//! ## Architecture
//!
//! | Crate | Purpose |
//! |-------|----------|
//! | `dlswitch-core` | DLPack types, key encoding, dispatch tables, fatal checks, stream environment |
//! | `dlswitch-cuda` | CUDA driver status checks and `CUstream` handles (feature-gated) |

pub use dlswitch_core::{
    check, dispatch, dlpack, dtype, env, error, get_stream, half, status_to_result, try_dispatch,
    DLDataType, DLDataTypeCode, DLDevice, DLDeviceType, DLElement, DLTensor, DType, DeviceStatus,
    DispatchTable, ElementOp, Error, FloatTable, IntTable, Result, StreamEnv, StreamHandle,
    TensorMeta, UIntTable,
};
pub use dlswitch_core::{
    bail, check_success, dispatch_dlpack_dtype, dispatch_dlpack_dtype_to_ctype_float,
    dispatch_table, function_name, icheck,
};

#[cfg(feature = "tvm-ffi")]
pub use dlswitch_core::TvmFfiEnv;

/// Re-export CUDA helpers (requires `cuda` feature).
#[cfg(feature = "cuda")]
pub mod cuda {
    pub use dlswitch_cuda::*;
}

/// Convenience prelude.
pub mod prelude {
    pub use dlswitch_core::{
        dispatch, get_stream, try_dispatch, DLDataType, DLDataTypeCode, DLDevice, DLDeviceType,
        DLElement, DLTensor, DType, DispatchTable, ElementOp, FloatTable, IntTable, StreamEnv,
        StreamHandle, TensorMeta, UIntTable,
    };
    pub use dlswitch_core::{dispatch_dlpack_dtype, dispatch_dlpack_dtype_to_ctype_float};
}
