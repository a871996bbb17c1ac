//! Instrumentation compiled out unless the `tracing` feature is enabled.

/// Enters a `TRACE` span that lasts until the end of the enclosing block.
#[doc(hidden)]
#[macro_export]
macro_rules! __schema_span {
    ($name:literal $(, $($fields:tt)+)?) => {
        #[cfg(feature = "tracing")]
        let _span = $crate::tracing::trace_span!($name $(, $($fields)+)?).entered();
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __schema_event {
    ($level:ident, $($args:tt)+) => {{
        #[cfg(feature = "tracing")]
        $crate::tracing::event!($crate::tracing::Level::$level, $($args)+);
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __schema_trace {
    ($($args:tt)+) => {
        $crate::__schema_event!(TRACE, $($args)+)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __schema_debug {
    ($($args:tt)+) => {
        $crate::__schema_event!(DEBUG, $($args)+)
    };
}
