use std::ffi::c_void;
use std::fmt;

use crate::error::{Error, Result};

// DLPack — ABI-compatible descriptor types
//
// These mirror the C structs of the DLPack tensor-interchange standard so a
// `*const DLTensor` handed over by another framework can be read directly.
// Only metadata is ever inspected here: `data` is carried, never dereferenced.

/// Broad numeric family of a [`DLDataType`] (`DLDataTypeCode` in dlpack.h).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DLDataTypeCode {
    Int = 0,
    UInt = 1,
    Float = 2,
    OpaqueHandle = 3,
    Bfloat = 4,
    Complex = 5,
    Bool = 6,
}

impl TryFrom<u8> for DLDataTypeCode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        Ok(match code {
            0 => DLDataTypeCode::Int,
            1 => DLDataTypeCode::UInt,
            2 => DLDataTypeCode::Float,
            3 => DLDataTypeCode::OpaqueHandle,
            4 => DLDataTypeCode::Bfloat,
            5 => DLDataTypeCode::Complex,
            6 => DLDataTypeCode::Bool,
            other => return Err(Error::InvalidTypeCode(other)),
        })
    }
}

/// Element type descriptor: numeric family, bit width and vector lanes.
///
/// Layout matches `DLDataType` from dlpack.h (`uint8_t code`, `uint8_t bits`,
/// `uint16_t lanes`).
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DLDataType {
    pub code: u8,
    pub bits: u8,
    pub lanes: u16,
}

impl DLDataType {
    pub const fn new(code: DLDataTypeCode, bits: u8, lanes: u16) -> Self {
        DLDataType {
            code: code as u8,
            bits,
            lanes,
        }
    }

    /// Scalar (single-lane) descriptor.
    pub const fn scalar(code: DLDataTypeCode, bits: u8) -> Self {
        Self::new(code, bits, 1)
    }

    /// The typed family, if `code` is one DLPack defines.
    pub fn type_code(&self) -> Result<DLDataTypeCode> {
        DLDataTypeCode::try_from(self.code)
    }
}

impl fmt::Debug for DLDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DLDataType(code={}, bits={}, lanes={})",
            self.code, self.bits, self.lanes
        )
    }
}

/// Device kind (`DLDeviceType` in dlpack.h).
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DLDeviceType {
    Cpu = 1,
    Cuda = 2,
    CudaHost = 3,
    OpenCL = 4,
    Vulkan = 7,
    Metal = 8,
    Vpi = 9,
    Rocm = 10,
    RocmHost = 11,
    ExtDev = 12,
    CudaManaged = 13,
    OneApi = 14,
    WebGpu = 15,
    Hexagon = 16,
    Maia = 17,
}

/// A device: kind plus ordinal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DLDevice {
    pub device_type: DLDeviceType,
    pub device_id: i32,
}

impl DLDevice {
    pub const fn new(device_type: DLDeviceType, device_id: i32) -> Self {
        DLDevice {
            device_type,
            device_id,
        }
    }

    pub const fn cpu() -> Self {
        Self::new(DLDeviceType::Cpu, 0)
    }

    pub const fn cuda(device_id: i32) -> Self {
        Self::new(DLDeviceType::Cuda, device_id)
    }
}

impl fmt::Display for DLDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.device_type, self.device_id)
    }
}

/// Borrowed tensor view (`DLTensor` in dlpack.h).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DLTensor {
    pub data: *mut c_void,
    pub device: DLDevice,
    pub ndim: i32,
    pub dtype: DLDataType,
    pub shape: *mut i64,
    /// Null means compact row-major.
    pub strides: *mut i64,
    pub byte_offset: u64,
}

// TensorMeta — what dispatch and stream lookup need from a tensor
//
// Callers usually hold their own tensor type (a framework handle, a TVM FFI
// tensor, a plain DLTensor). Anything that can report its device and element
// type can be dispatched on.

/// Device and dtype metadata of a tensor-like value.
pub trait TensorMeta {
    fn device(&self) -> DLDevice;
    fn dtype(&self) -> DLDataType;
}

impl TensorMeta for DLTensor {
    fn device(&self) -> DLDevice {
        self.device
    }

    fn dtype(&self) -> DLDataType {
        self.dtype
    }
}

impl<M: TensorMeta + ?Sized> TensorMeta for &M {
    fn device(&self) -> DLDevice {
        (**self).device()
    }

    fn dtype(&self) -> DLDataType {
        (**self).dtype()
    }
}
