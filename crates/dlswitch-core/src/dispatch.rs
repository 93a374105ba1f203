// Dtype dispatch — runtime descriptor to compile-time element type
//
// A kernel wrapper receives a tensor whose element type is only known at
// runtime (a DLDataType) but wants to call code monomorphized for a concrete
// Rust type. A dispatch table closes that gap:
//
//   1. encode the descriptor into its key,
//   2. compare it with each arm's key in declaration order,
//   3. on the match, run the operation with that arm's type bound.
//
// Rust closures cannot be generic over a type parameter, so an operation is a
// value implementing `ElementOp`. For inline bodies the `dispatch_dlpack_dtype!`
// family binds a local type alias instead.
//
// Tables are declared with `dispatch_table!` from a list of `DLElement` types.
// Each declaration asserts at compile time that its keys are pairwise distinct.
//
// USAGE:
//   struct Fill<'a> { buf: &'a mut [u8], value: f64 }
//   impl ElementOp for Fill<'_> {
//       type Output = ();
//       fn run<T: DLElement>(self) { /* launch fill::<T> */ }
//   }
//   dispatch::<FloatTable, _>(function_name!(), tensor.dtype(), fill);

use crate::check::fatal;
use crate::dlpack::DLDataType;
use crate::dtype::{encode_dlpack_dtype, lanes_fit_key, DLElement};
use crate::error::{Error, Result};

/// An operation generic over one element type.
pub trait ElementOp {
    type Output;

    fn run<T: DLElement>(self) -> Self::Output;
}

/// A fixed set of descriptor → element-type arms.
pub trait DispatchTable {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Descriptors of the arms, in match order.
    const SUPPORTED: &'static [DLDataType];

    /// Run `op` with the arm matching `dtype`, or hand `op` back untouched.
    fn select<O: ElementOp>(dtype: DLDataType, op: O) -> std::result::Result<O::Output, O>;

    /// Whether some arm accepts `dtype`.
    fn supports(dtype: DLDataType) -> bool {
        lanes_fit_key(dtype)
            && Self::SUPPORTED
                .iter()
                .any(|arm| encode_dlpack_dtype(*arm) == encode_dlpack_dtype(dtype))
    }
}

/// Declare a dispatch table type from a list of element types.
///
/// ```
/// dlswitch_core::dispatch_table! {
///     /// Quantized storage types.
///     pub struct QuantTable { i8, u8 }
/// }
/// ```
#[macro_export]
macro_rules! dispatch_table {
    ($(#[$meta:meta])* $vis:vis struct $name:ident { $($ty:ty),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $name;

        const _: () = assert!(
            $crate::dtype::keys_distinct(&[$(<$ty as $crate::DLElement>::KEY),+]),
            "dispatch table has colliding keys"
        );

        impl $crate::dispatch::DispatchTable for $name {
            const NAME: &'static str = stringify!($name);
            const SUPPORTED: &'static [$crate::DLDataType] =
                &[$(<$ty as $crate::DLElement>::DLPACK),+];

            #[inline]
            fn select<O: $crate::dispatch::ElementOp>(
                dtype: $crate::DLDataType,
                op: O,
            ) -> ::std::result::Result<O::Output, O> {
                if !$crate::dtype::lanes_fit_key(dtype) {
                    return Err(op);
                }
                let key = $crate::dtype::encode_dlpack_dtype(dtype);
                $(
                    if key == <$ty as $crate::DLElement>::KEY {
                        return Ok(<O as $crate::dispatch::ElementOp>::run::<$ty>(op));
                    }
                )+
                Err(op)
            }
        }
    };
}

dispatch_table! {
    /// float16, float32, float64, bfloat16.
    pub struct FloatTable { half::f16, f32, f64, half::bf16 }
}

dispatch_table! {
    /// Signed integers, 8 to 64 bits.
    pub struct IntTable { i8, i16, i32, i64 }
}

dispatch_table! {
    /// Unsigned integers, 8 to 64 bits.
    pub struct UIntTable { u8, u16, u32, u64 }
}

/// Run `op` through table `D`, returning `Error::UnsupportedDType` on a miss.
///
/// `context` names the caller in the error (see [`function_name!`](crate::function_name)).
pub fn try_dispatch<D, O>(context: &str, dtype: DLDataType, op: O) -> Result<O::Output>
where
    D: DispatchTable,
    O: ElementOp,
{
    match D::select(dtype, op) {
        Ok(out) => {
            log::trace!("{context}: {dtype:?} resolved by {}", D::NAME);
            Ok(out)
        }
        Err(_) => Err(Error::UnsupportedDType {
            context: context.to_string(),
            code: dtype.code,
            bits: dtype.bits,
            lanes: dtype.lanes,
        }),
    }
}

/// Run `op` through table `D`, panicking if no arm matches `dtype`.
///
/// The operation runs synchronously and exactly once before this returns.
#[track_caller]
pub fn dispatch<D, O>(context: &str, dtype: DLDataType, op: O) -> O::Output
where
    D: DispatchTable,
    O: ElementOp,
{
    match try_dispatch::<D, O>(context, dtype, op) {
        Ok(out) => out,
        Err(err) => fatal(err),
    }
}

/// Bind `T` to the element type `dtype` names among the listed types and
/// evaluate `body`. Evaluates to `true`; panics if no listed type matches.
///
/// `body` runs inline in the calling function: `?` inside it returns from
/// the caller.
///
/// ```
/// use dlswitch_core::{dispatch_dlpack_dtype, dtype::DL_FLOAT32};
///
/// let mut size = 0;
/// let ok = dispatch_dlpack_dtype!(DL_FLOAT32, T => size = std::mem::size_of::<T>(), [i32, f32]);
/// assert!(ok);
/// assert_eq!(size, 4);
/// ```
#[macro_export]
macro_rules! dispatch_dlpack_dtype {
    ($dtype:expr, $T:ident => $body:expr, [$($ty:ty),+ $(,)?]) => {{
        let dtype: $crate::DLDataType = $dtype;
        let key = $crate::dtype::encode_dlpack_dtype(dtype);
        let fits = $crate::dtype::lanes_fit_key(dtype);
        $(
            if fits && key == <$ty as $crate::DLElement>::KEY {
                #[allow(dead_code)]
                type $T = $ty;
                $body;
                true
            } else
        )+
        {
            $crate::check::fatal($crate::Error::UnsupportedDType {
                context: $crate::function_name!().to_string(),
                code: dtype.code,
                bits: dtype.bits,
                lanes: dtype.lanes,
            })
        }
    }};
}

/// [`dispatch_dlpack_dtype!`] over float16, float32, float64 and bfloat16.
#[macro_export]
macro_rules! dispatch_dlpack_dtype_to_ctype_float {
    ($dtype:expr, $T:ident => $body:expr) => {
        $crate::dispatch_dlpack_dtype!(
            $dtype,
            $T => $body,
            [$crate::half::f16, f32, f64, $crate::half::bf16]
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dlpack::DLDataTypeCode;
    use crate::dtype::{DType, DL_BFLOAT16, DL_FLOAT16, DL_FLOAT32, DL_FLOAT64};
    use std::any::TypeId;
    use std::cell::Cell;

    struct Probe<'a> {
        calls: &'a Cell<usize>,
    }

    impl ElementOp for Probe<'_> {
        type Output = TypeId;
        fn run<T: DLElement>(self) -> TypeId {
            self.calls.set(self.calls.get() + 1);
            TypeId::of::<T>()
        }
    }

    fn probe(dtype: DLDataType) -> (TypeId, usize) {
        let calls = Cell::new(0);
        let id = dispatch::<FloatTable, _>("probe", dtype, Probe { calls: &calls });
        (id, calls.get())
    }

    #[test]
    fn test_float_arms_bind_expected_types() {
        assert_eq!(probe(DL_FLOAT16), (TypeId::of::<half::f16>(), 1));
        assert_eq!(probe(DL_FLOAT32), (TypeId::of::<f32>(), 1));
        assert_eq!(probe(DL_FLOAT64), (TypeId::of::<f64>(), 1));
        assert_eq!(probe(DL_BFLOAT16), (TypeId::of::<half::bf16>(), 1));
    }

    #[test]
    fn test_dispatch_is_deterministic() {
        for dtype in FloatTable::SUPPORTED {
            assert_eq!(probe(*dtype), probe(*dtype));
        }
    }

    #[test]
    fn test_miss_returns_error_without_running() {
        let calls = Cell::new(0);
        let i32_dtype = DLDataType::scalar(DLDataTypeCode::Int, 32);
        let err = try_dispatch::<FloatTable, _>("ctx", i32_dtype, Probe { calls: &calls })
            .unwrap_err();
        assert_eq!(calls.get(), 0);
        assert_eq!(
            err,
            Error::UnsupportedDType {
                context: "ctx".into(),
                code: 0,
                bits: 32,
                lanes: 1
            }
        );
        assert_eq!(err.to_string(), "ctx failed to dispatch data type 0 32");
    }

    #[test]
    #[should_panic(expected = "launch_gelu failed to dispatch data type 0 32")]
    fn test_miss_is_fatal() {
        let calls = Cell::new(0);
        dispatch::<FloatTable, _>(
            "launch_gelu",
            DLDataType::scalar(DLDataTypeCode::Int, 32),
            Probe { calls: &calls },
        );
    }

    #[test]
    fn test_vector_lanes_rejected() {
        let calls = Cell::new(0);
        let vec4 = DLDataType::new(DLDataTypeCode::Float, 32, 4);
        assert!(try_dispatch::<FloatTable, _>("v", vec4, Probe { calls: &calls }).is_err());
        // Would alias float16's key if lanes were allowed to overflow.
        let wide = DLDataType::new(DLDataTypeCode::Float, 0, 0x1001);
        assert!(!FloatTable::supports(wide));
        assert!(try_dispatch::<FloatTable, _>("w", wide, Probe { calls: &calls }).is_err());
        assert_eq!(calls.get(), 0);
    }

    struct Cast(f64);

    impl ElementOp for Cast {
        type Output = Option<f64>;
        fn run<T: DLElement>(self) -> Option<f64> {
            let v: T = num_traits::cast(self.0)?;
            num_traits::cast(v)
        }
    }

    #[test]
    fn test_int_tables() {
        let i16_dtype = DLDataType::scalar(DLDataTypeCode::Int, 16);
        assert_eq!(dispatch::<IntTable, _>("cast", i16_dtype, Cast(-7.0)), Some(-7.0));
        assert_eq!(dispatch::<IntTable, _>("cast", i16_dtype, Cast(1e6)), None);
        let u8_dtype = DType::U8.to_dlpack();
        assert_eq!(dispatch::<UIntTable, _>("cast", u8_dtype, Cast(255.0)), Some(255.0));
        assert!(!UIntTable::supports(i16_dtype));
        assert!(!IntTable::supports(DL_FLOAT32));
    }

    #[test]
    fn test_half_precision_rounding() {
        assert_eq!(dispatch::<FloatTable, _>("cast", DL_FLOAT16, Cast(2.5)), Some(2.5));
        // bf16 keeps 8 mantissa bits.
        assert_eq!(dispatch::<FloatTable, _>("cast", DL_BFLOAT16, Cast(1.001)), Some(1.0));
    }

    #[test]
    fn test_table_metadata() {
        assert_eq!(FloatTable::NAME, "FloatTable");
        assert_eq!(
            FloatTable::SUPPORTED,
            &[DL_FLOAT16, DL_FLOAT32, DL_FLOAT64, DL_BFLOAT16]
        );
        assert!(FloatTable::supports(DL_BFLOAT16));
    }

    #[test]
    fn test_macro_binds_alias() {
        let mut dtype_seen = None;
        let ok = dispatch_dlpack_dtype_to_ctype_float!(DL_BFLOAT16, Scalar => {
            dtype_seen = Some(<Scalar as DLElement>::DTYPE);
        });
        assert!(ok);
        assert_eq!(dtype_seen, Some(DType::BF16));
    }

    #[test]
    #[should_panic(expected = "test_macro_miss_names_caller failed to dispatch data type 1 8")]
    fn test_macro_miss_names_caller() {
        dispatch_dlpack_dtype_to_ctype_float!(DType::U8.to_dlpack(), T => ());
    }
}
