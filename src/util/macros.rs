/// Builds an `anyhow::Error` whose message ends with the `file:line:col` it was raised at.
#[macro_export]
macro_rules! lined_err {
    ($msg:expr) => {{
        let location = format!("{}:{}:{}", file!(), line!(), column!());
        anyhow::anyhow!("{} (at {})", $msg, location)
    }};
    ($fmt:expr, $($arg:tt)*) => {{
        let location = format!("{}:{}:{}", file!(), line!(), column!());
        anyhow::anyhow!("{} (at {})", format!($fmt, $($arg)*), location)
    }};
}

/// Returns early with a `lined_err!` when the condition does not hold.
#[macro_export]
macro_rules! ensure_lined {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::lined_err!($($arg)*));
        }
    };
}
