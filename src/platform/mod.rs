//! Platform abstraction layer
//!
//! Everything above this module is plain Rust driven by explicit clocks and
//! element boxes. The browser bindings here translate DOM events into those
//! calls and write the results back to the page.

#[cfg(target_arch = "wasm32")]
pub mod web;
