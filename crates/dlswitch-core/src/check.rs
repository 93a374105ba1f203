use crate::error::{Error, Result};

// Fatal checks
//
// An unsupported dtype or a failed device-runtime call at these call sites is
// a caller bug, not a transient condition. Both end in a panic whose message
// is the Display text of the matching `Error` variant, logged first so it
// survives even when the panic is caught upstream.

/// Log `err` and panic with its message.
#[cold]
#[track_caller]
pub fn fatal(err: Error) -> ! {
    log::error!("{err}");
    panic!("{err}")
}

/// Panic unless `cond` holds.
///
/// Usage: `icheck!(n > 0, "empty launch for {}", name)`
#[macro_export]
macro_rules! icheck {
    ($cond:expr $(,)?) => {
        if !$cond {
            $crate::check::fatal($crate::Error::msg(concat!(
                "Check failed: (",
                stringify!($cond),
                ") is false"
            )))
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::check::fatal($crate::Error::msg(format!(
                "Check failed: ({}) is false: {}",
                stringify!($cond),
                format_args!($($arg)+)
            )))
        }
    };
}

/// Path of the enclosing function, e.g. `my_crate::ops::launch_softmax`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// A status code returned by a device runtime.
pub trait DeviceStatus: Copy {
    fn is_success(&self) -> bool;

    /// Human-readable description supplied by the runtime.
    fn description(&self) -> String;
}

/// `Ok(())` on success, `Error::DeviceRuntime` otherwise.
pub fn status_to_result<S: DeviceStatus>(status: S) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::DeviceRuntime {
            message: status.description(),
        })
    }
}

/// Panic with `"CUDA Failure: <description>"` unless the status is success.
#[macro_export]
macro_rules! check_success {
    ($status:expr) => {
        if let Err(err) = $crate::check::status_to_result($status) {
            $crate::check::fatal(err)
        }
    };
}
