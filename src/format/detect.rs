//! Content sniffing for tile payloads.
//!
//! MBTiles stores tiles as opaque blobs and the `format` metadata key is
//! optional and often wrong, so the content type of a tile is determined from
//! its first bytes. Supported payloads:
//!
//! - **PNG**, **JPEG**, **GIF** and **WebP** raster tiles
//! - **Mapbox Vector Tiles**, either gzip/zlib compressed or plain protobuf
//!
//! Anything else is served as `application/octet-stream`.

// =============================================================================
// Signatures
// =============================================================================

/// PNG file signature.
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// RIFF container marker (WebP files start with it).
const RIFF_MAGIC: &[u8] = b"RIFF";

/// WebP form type, stored at offset 8 of the RIFF container.
const WEBP_MAGIC: &[u8] = b"WEBP";

/// Offset of the form type inside a RIFF header.
const WEBP_TAG_OFFSET: usize = 8;

/// GIF signatures (both revisions).
const GIF87_MAGIC: &[u8] = b"GIF87a";
const GIF89_MAGIC: &[u8] = b"GIF89a";

/// JPEG SOI marker followed by the first segment marker prefix.
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// gzip member header.
const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B];

/// zlib header with default compression.
const ZLIB_MAGIC: &[u8] = &[0x78, 0x9C];

/// Tag of the `layers` field (3, length-delimited) that opens an
/// uncompressed vector tile.
const MVT_LAYERS_TAG: u8 = 0x1A;

/// Content type for anything unrecognised.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type for Mapbox Vector Tiles.
pub const MVT_CONTENT_TYPE: &str = "application/x-protobuf";

// =============================================================================
// TileFormat
// =============================================================================

/// Detected tile payload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileFormat {
    Png,
    Jpeg,
    Gif,
    Webp,

    /// Vector tile, gzip-compressed
    GzipMvt,

    /// Vector tile, zlib-compressed
    ZlibMvt,

    /// Uncompressed vector tile
    Mvt,

    /// Unrecognised payload
    Unknown,
}

impl TileFormat {
    /// MIME type served for this format.
    pub const fn content_type(&self) -> &'static str {
        match self {
            TileFormat::Png => "image/png",
            TileFormat::Jpeg => "image/jpeg",
            TileFormat::Gif => "image/gif",
            TileFormat::Webp => "image/webp",
            TileFormat::GzipMvt | TileFormat::ZlibMvt | TileFormat::Mvt => MVT_CONTENT_TYPE,
            TileFormat::Unknown => DEFAULT_CONTENT_TYPE,
        }
    }

    /// `Content-Encoding` the payload is already stored with, if any.
    pub const fn content_encoding(&self) -> Option<&'static str> {
        match self {
            TileFormat::GzipMvt => Some("gzip"),
            TileFormat::ZlibMvt => Some("deflate"),
            _ => None,
        }
    }
}

// =============================================================================
// ContentDescriptor
// =============================================================================

/// Headers derived from a tile payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentDescriptor {
    /// The detected format
    pub format: TileFormat,

    /// Value for the `Content-Type` header
    pub content_type: &'static str,

    /// Value for the `Content-Encoding` header, if the payload is compressed
    pub content_encoding: Option<&'static str>,
}

impl ContentDescriptor {
    fn from_format(format: TileFormat) -> Self {
        Self {
            format,
            content_type: format.content_type(),
            content_encoding: format.content_encoding(),
        }
    }

    /// All header pairs to attach to a response carrying this payload.
    pub fn headers(&self) -> Vec<(&'static str, &'static str)> {
        let mut headers = vec![("content-type", self.content_type)];
        if let Some(encoding) = self.content_encoding {
            headers.push(("content-encoding", encoding));
        }
        headers
    }
}

// =============================================================================
// Detection
// =============================================================================

/// Detect the format of a tile payload from its leading bytes.
///
/// Signatures are checked longest first so that a short signature never
/// shadows a longer one sharing its prefix. Never fails: unknown or empty
/// payloads map to [`TileFormat::Unknown`].
pub fn detect_format(bytes: &[u8]) -> TileFormat {
    if bytes.starts_with(PNG_MAGIC) {
        TileFormat::Png
    } else if is_webp(bytes) {
        TileFormat::Webp
    } else if bytes.starts_with(GIF87_MAGIC) || bytes.starts_with(GIF89_MAGIC) {
        TileFormat::Gif
    } else if bytes.starts_with(JPEG_MAGIC) {
        TileFormat::Jpeg
    } else if bytes.starts_with(GZIP_MAGIC) {
        TileFormat::GzipMvt
    } else if bytes.starts_with(ZLIB_MAGIC) {
        TileFormat::ZlibMvt
    } else if bytes.first() == Some(&MVT_LAYERS_TAG) {
        TileFormat::Mvt
    } else {
        TileFormat::Unknown
    }
}

/// Detect the content descriptor (type and encoding) of a tile payload.
pub fn detect(bytes: &[u8]) -> ContentDescriptor {
    ContentDescriptor::from_format(detect_format(bytes))
}

/// Check for a RIFF container carrying a WEBP form type.
fn is_webp(bytes: &[u8]) -> bool {
    bytes.starts_with(RIFF_MAGIC)
        && bytes
            .get(WEBP_TAG_OFFSET..WEBP_TAG_OFFSET + WEBP_MAGIC.len())
            .is_some_and(|tag| tag == WEBP_MAGIC)
}

// =============================================================================
// Tests
// =============================================================================
