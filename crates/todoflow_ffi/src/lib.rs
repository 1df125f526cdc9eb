//! Flutter-facing FFI surface of the todoflow core.

pub mod api;
