use std::fmt;

use crate::bail;
use crate::dlpack::{DLDataType, DLDataTypeCode};
use crate::error::Result;

// Encoded keys
//
// A descriptor packs into a single integer so a dispatch table can compare
// one value per arm:
//
//   key = (code << 16) | (bits << 8) | lanes
//
// The packing is injective only while `lanes` fits in 8 bits. DLPack allows
// 16-bit lanes, so `lanes_fit_key` must hold before a key is trusted to
// identify a descriptor.

/// Pack a descriptor into its dispatch key.
#[inline]
pub const fn encode_dlpack_dtype(dtype: DLDataType) -> i64 {
    ((dtype.code as i64) << 16) | ((dtype.bits as i64) << 8) | dtype.lanes as i64
}

/// Whether `lanes` stays inside its 8-bit slot of the key.
#[inline]
pub const fn lanes_fit_key(dtype: DLDataType) -> bool {
    dtype.lanes <= 0xFF
}

pub const DL_FLOAT16: DLDataType = DLDataType::scalar(DLDataTypeCode::Float, 16);
pub const DL_FLOAT32: DLDataType = DLDataType::scalar(DLDataTypeCode::Float, 32);
pub const DL_FLOAT64: DLDataType = DLDataType::scalar(DLDataTypeCode::Float, 64);
pub const DL_BFLOAT16: DLDataType = DLDataType::scalar(DLDataTypeCode::Bfloat, 16);

pub const FLOAT16_CODE: i64 = encode_dlpack_dtype(DL_FLOAT16);
pub const FLOAT32_CODE: i64 = encode_dlpack_dtype(DL_FLOAT32);
pub const FLOAT64_CODE: i64 = encode_dlpack_dtype(DL_FLOAT64);
pub const BFLOAT16_CODE: i64 = encode_dlpack_dtype(DL_BFLOAT16);

/// True if no two keys in `keys` are equal. Used for compile-time table checks.
pub const fn keys_distinct(keys: &[i64]) -> bool {
    let mut i = 0;
    while i < keys.len() {
        let mut j = i + 1;
        while j < keys.len() {
            if keys[i] == keys[j] {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// Element data types a dispatch table can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    F16,
    BF16,
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl DType {
    /// Size of one element in bytes.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::I8 | DType::U8 => 1,
            DType::F16 | DType::BF16 | DType::I16 | DType::U16 => 2,
            DType::F32 | DType::I32 | DType::U32 => 4,
            DType::F64 | DType::I64 | DType::U64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DType::F16 | DType::BF16 | DType::F32 | DType::F64)
    }

    /// Whether this is a half-precision type (F16 or BF16).
    pub fn is_half(&self) -> bool {
        matches!(self, DType::F16 | DType::BF16)
    }

    /// Scalar DLPack descriptor for this dtype.
    pub fn to_dlpack(&self) -> DLDataType {
        let code = match self {
            DType::F16 | DType::F32 | DType::F64 => DLDataTypeCode::Float,
            DType::BF16 => DLDataTypeCode::Bfloat,
            DType::I8 | DType::I16 | DType::I32 | DType::I64 => DLDataTypeCode::Int,
            DType::U8 | DType::U16 | DType::U32 | DType::U64 => DLDataTypeCode::UInt,
        };
        DLDataType::scalar(code, (self.size_in_bytes() * 8) as u8)
    }

    /// The dtype a scalar DLPack descriptor names.
    pub fn from_dlpack(dtype: DLDataType) -> Result<Self> {
        if dtype.lanes != 1 {
            bail!("vector dtype {dtype:?} has no scalar DType");
        }
        let code = dtype.type_code()?;
        Ok(match (code, dtype.bits) {
            (DLDataTypeCode::Float, 16) => DType::F16,
            (DLDataTypeCode::Float, 32) => DType::F32,
            (DLDataTypeCode::Float, 64) => DType::F64,
            (DLDataTypeCode::Bfloat, 16) => DType::BF16,
            (DLDataTypeCode::Int, 8) => DType::I8,
            (DLDataTypeCode::Int, 16) => DType::I16,
            (DLDataTypeCode::Int, 32) => DType::I32,
            (DLDataTypeCode::Int, 64) => DType::I64,
            (DLDataTypeCode::UInt, 8) => DType::U8,
            (DLDataTypeCode::UInt, 16) => DType::U16,
            (DLDataTypeCode::UInt, 32) => DType::U32,
            (DLDataTypeCode::UInt, 64) => DType::U64,
            _ => bail!("no DType for {dtype:?}"),
        })
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DType::F16 => "f16",
            DType::BF16 => "bf16",
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::I8 => "i8",
            DType::I16 => "i16",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::U8 => "u8",
            DType::U16 => "u16",
            DType::U32 => "u32",
            DType::U64 => "u64",
        };
        write!(f, "{}", s)
    }
}

// DLElement — Rust storage types a descriptor can resolve to
//
// Each impl ties a concrete Rust type to its DLPack descriptor. The encoded
// key is an associated constant so dispatch tables compare against values
// computed at compile time.

/// Trait implemented by Rust types a dispatch arm can bind.
pub trait DLElement: Copy + Send + Sync + 'static + num_traits::NumCast + fmt::Debug {
    /// Descriptor of one element of this type.
    const DLPACK: DLDataType;

    /// `encode_dlpack_dtype(Self::DLPACK)`.
    const KEY: i64 = encode_dlpack_dtype(Self::DLPACK);

    /// The corresponding DType enum variant.
    const DTYPE: DType;
}

macro_rules! impl_dl_element {
    ($($ty:ty => $code:ident, $bits:literal, $dtype:ident;)+) => {
        $(
            impl DLElement for $ty {
                const DLPACK: DLDataType = DLDataType::scalar(DLDataTypeCode::$code, $bits);
                const DTYPE: DType = DType::$dtype;
            }
        )+
    };
}

impl_dl_element! {
    half::f16 => Float, 16, F16;
    f32 => Float, 32, F32;
    f64 => Float, 64, F64;
    half::bf16 => Bfloat, 16, BF16;
    i8 => Int, 8, I8;
    i16 => Int, 16, I16;
    i32 => Int, 32, I32;
    i64 => Int, 64, I64;
    u8 => UInt, 8, U8;
    u16 => UInt, 16, U16;
    u32 => UInt, 32, U32;
    u64 => UInt, 64, U64;
}
