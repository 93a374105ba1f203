//! # dlswitch-core
//!
//! DLPack dtype dispatch for kernel wrappers.
//!
//! This crate provides:
//! - [`DLDataType`], [`DLDevice`], [`DLTensor`] — DLPack ABI descriptor types
//! - [`encode_dlpack_dtype`] — packs a descriptor into a single dispatch key
//! - [`DLElement`] / [`DType`] — Rust element types and their descriptors
//! - [`dispatch`] / [`try_dispatch`] and the [`dispatch_table!`] family —
//!   run code monomorphized for the element type a descriptor names
//! - [`get_stream`] — forward a tensor's device to the host stream query
//! - [`icheck!`] / [`check_success!`] — fatal checks
// - dlpack: repr(C) structs shared with other frameworks
// - dtype: key encoding, DType enum, DLElement trait
// - dispatch: ElementOp, DispatchTable, the provided tables and macros
// - check: fatal assertions and device-status checks
// - env: stream environment

pub mod check;
pub mod dispatch;
pub mod dlpack;
pub mod dtype;
pub mod env;
pub mod error;

pub use half;

pub use check::{status_to_result, DeviceStatus};
pub use dispatch::{
    dispatch, try_dispatch, DispatchTable, ElementOp, FloatTable, IntTable, UIntTable,
};
pub use dlpack::{DLDataType, DLDataTypeCode, DLDevice, DLDeviceType, DLTensor, TensorMeta};
pub use dtype::{encode_dlpack_dtype, DLElement, DType};
pub use env::{get_stream, StreamEnv, StreamHandle};
#[cfg(feature = "tvm-ffi")]
pub use env::TvmFfiEnv;
pub use error::{Error, Result};
