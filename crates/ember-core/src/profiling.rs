//! Profiling utilities based on the `puffin` crate.

pub use puffin::{profile_function, profile_scope};

/// Turn puffin scope collection on or off.
pub fn set_enabled(enabled: bool) {
    puffin::set_scopes_on(enabled);
    tracing::debug!("puffin scopes {}", if enabled { "enabled" } else { "disabled" });
}

/// Mark the start of a new frame for profiling.
///
/// Call once per frame, before ticking loaders.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}
