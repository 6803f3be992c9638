//! Small crate-wide convenience macros.

/// Debug-only console logging.
///
/// Formats like `format!` and writes the result to the browser console via
/// `web_sys::console::log_1`.  Release builds and non-wasm targets (native
/// unit tests) compile the call down to nothing, but the arguments are still
/// type-checked so a log line can never rot silently.
///
/// ```rust,ignore
/// debug_log!("🔗 Connecting {} → {}", source_id, target_id);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        #[cfg(all(debug_assertions, target_arch = "wasm32"))]
        {
            web_sys::console::log_1(&format!($($arg)*).into());
        }
        #[cfg(not(all(debug_assertions, target_arch = "wasm32")))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

/// Quick helper to build an `rgba(r, g, b, a)` CSS colour from one of the
/// `*_RGB` triples in `constants` and a runtime alpha.
///
/// ```rust,ignore
/// let glow = rgba!(FLOW_GLOW_RGB, 0.6); // "rgba(34, 197, 94, 0.6)"
/// ```
#[macro_export]
macro_rules! rgba {
    ($rgb:expr, $alpha:expr) => {
        format!("rgba({}, {})", $rgb, $alpha)
    };
}
