//! Tile payload formats.
//!
//! Use [`detect::detect`] to derive the `Content-Type` (and, for compressed
//! vector tiles, the `Content-Encoding`) of a tile from its bytes.

pub mod detect;

pub use detect::{
    detect, detect_format, ContentDescriptor, TileFormat, DEFAULT_CONTENT_TYPE, MVT_CONTENT_TYPE,
};
