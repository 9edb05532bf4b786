//! Page header with a per-page title and background image.
//!
//! [`HeaderResolver`] owns the DOM side: it creates the header block once,
//! keeps its title and page class current, and applies resolved images with
//! a short fade. Where the image comes from is an [`ImageSource`]: a static
//! asset table or a remote photo search.

mod header_component;
mod image_source;

pub use header_component::{HeaderElements, HeaderResolver};
pub use image_source::{ImageSource, PhotoSearch, RemoteImageSource, StaticImageSource, image_source_for};
