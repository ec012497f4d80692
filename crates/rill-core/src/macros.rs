/// Macro to return early with an error
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::from(eyre::Error::msg(format!($($arg)*))))
    };
}

/// Abort lowering: an IR construct reached a site that cannot encode it.
#[macro_export]
macro_rules! bail_unsupported {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::Unsupported {
            kind: format!($($arg)*),
        })
    };
}

/// Log a warning message
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

/// Log a debug message
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

/// Log a trace message
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}
