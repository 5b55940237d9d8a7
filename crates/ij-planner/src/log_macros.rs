/// Domain-aware logging macros.
///
/// Each macro injects a `domain` field so planner events can be filtered by
/// concern: `rule` (rule matching and transforms), `hint` (hint parsing),
/// `plan` (plan tree conversion).
///
/// # Usage
///
/// ```ignore
/// ij_debug!(rule, rule = self.name(), "rule matched");
/// ij_warn!(hint, hint = %hint.name, "duplicate early-fire hint ignored");
/// ```
///
/// The domain identifier is a bare identifier that the macro converts to a
/// `&str` literal.

/// Internal helper.  Do not call directly; use `ij_warn!` … `ij_trace!`.
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

/// Log at DEBUG level with an automatic `domain` field.
macro_rules! ij_debug {
    ($domain:ident, $($rest:tt)*) => {
        ij_log!(debug, $domain, $($rest)*)
    };
}

/// Log at TRACE level with an automatic `domain` field.
macro_rules! ij_trace {
    ($domain:ident, $($rest:tt)*) => {
        ij_log!(trace, $domain, $($rest)*)
    };
}
