//! Domain-aware logging macros for the command-line front end.
//!
//! Same shape as the planner's macros: the first argument is a bare domain
//! identifier (`cli` for command handling) injected as the `domain` field,
//! which `tracing_init::DomainFormat` renders as the `[cli]` prefix.

#[doc(hidden)]
macro_rules! ij_log {
    ($level:ident, $domain:ident, $($field:tt)*) => {
        tracing::$level!(domain = stringify!($domain), $($field)*)
    };
}

/// Log at WARN level with an automatic `domain` field.
macro_rules! ij_warn {
    ($domain:ident, $($rest:tt)*) => {
        ij_log!(warn, $domain, $($rest)*)
    };
}

/// Log at INFO level with an automatic `domain` field.
macro_rules! ij_info {
    ($domain:ident, $($rest:tt)*) => {
        ij_log!(info, $domain, $($rest)*)
    };
}
