//! Image handle over the `image` crate: load PNG/JPEG/GIF/GD files, derive
//! cropped, scaled, mirrored or filtered copies, and save PNG/JPEG/GIF.

pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod handle;
pub mod io;
pub mod registry;

pub use config::SaveOptions;
pub use error::{ErrorKind, ImageError, Result};
pub use filter::Filter;
pub use format::ImageFormat;
pub use handle::Image;
pub use registry::CodecRegistry;
