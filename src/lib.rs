//! photoframe: album server and processing front end for 7-color
//! e-paper photo frames.
//!
//! The color pipeline itself lives in the `epaper-pipeline` crate; this
//! crate wraps it with everything a frame deployment needs: JPEG/PNG
//! decoding, the device BMP encoder, an album-scanning HTTP server with
//! a gallery management API, and a one-shot processing CLI.

pub mod api;
pub mod codec;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
