//! HTTP request handlers.
//!
//! Frame-facing endpoints (`/image`, `/thumbnail`, `/status`) follow the
//! contract the ESP32 frame polls; the `/api/*` endpoints back the photo
//! gallery web UI.

mod gallery;
mod image;
mod status;
mod thumbnail;

pub use gallery::{
    handle_delete, handle_display, handle_get_config, handle_list_images, handle_set_config,
    handle_upload,
};
pub use image::handle_image;
pub use status::handle_status;
pub use thumbnail::handle_thumbnail;
