//! FFI crate exposing the spanmark annotation session to a host UI.

pub mod api;

pub use api::*;
