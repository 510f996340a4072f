//! Tile coordinates and XYZ ↔ TMS row conversion.
//!
//! Tiles are addressed over HTTP in the XYZ convention (row 0 is the
//! northernmost row), while MBTiles stores them in the TMS convention
//! (row 0 is the southernmost row). The two are related by
//!
//! ```text
//! storage_row = (2^zoom - 1) - row
//! ```
//!
//! which is its own inverse for every row in `[0, 2^zoom - 1]`.

use crate::error::TileError;

/// Highest zoom level accepted in a tile address.
///
/// Rows are `u32`, so zoom 32 already covers every addressable row.
pub const MAX_ZOOM: u8 = 32;

/// Convert a row between the XYZ and TMS conventions at the given zoom.
///
/// No bounds clamping is performed: an out-of-range row yields an
/// out-of-range (possibly negative) storage row that simply matches no tile.
///
/// `zoom` must not exceed [`MAX_ZOOM`].
#[inline]
pub fn to_storage_row(zoom: u8, row: i64) -> i64 {
    debug_assert!(zoom <= MAX_ZOOM);
    ((1i64 << zoom) - 1) - row
}

/// Strip a trailing format suffix (`"3.png"` → `"3"`) from a row segment.
///
/// Everything from the last `.` on is discarded. The suffix is addressing
/// noise, not a content negotiation hint.
pub fn strip_row_suffix(raw: &str) -> &str {
    match raw.rfind('.') {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}

/// A tile address in the XYZ (top-left origin) convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Zoom level (0 = whole world in one tile)
    pub zoom: u8,

    /// Tile column (0-indexed from the west)
    pub column: u32,

    /// Tile row (0-indexed from the north)
    pub row: u32,
}

impl TileCoord {
    /// Create a new tile coordinate.
    pub fn new(zoom: u8, column: u32, row: u32) -> Self {
        Self { zoom, column, row }
    }

    /// Parse raw path segments into a coordinate.
    ///
    /// The row segment may carry a suffix such as `.png` or `.pbf`, which is
    /// stripped before parsing.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::BadRequest`] if a segment is not a non-negative
    /// integer or the zoom exceeds [`MAX_ZOOM`].
    pub fn parse(zoom: &str, column: &str, raw_row: &str) -> Result<Self, TileError> {
        let zoom = parse_segment::<u8>("zoom", zoom)?;
        if zoom > MAX_ZOOM {
            return Err(TileError::BadRequest {
                segment: "zoom",
                value: zoom.to_string(),
            });
        }

        let column = parse_segment::<u32>("column", column)?;
        let row = parse_segment::<u32>("row", strip_row_suffix(raw_row))?;

        Ok(Self { zoom, column, row })
    }

    /// The row of this tile in the TMS convention used on disk.
    pub fn storage_row(&self) -> i64 {
        to_storage_row(self.zoom, i64::from(self.row))
    }
}

fn parse_segment<T: std::str::FromStr>(segment: &'static str, value: &str) -> Result<T, TileError> {
    value.parse().map_err(|_| TileError::BadRequest {
        segment,
        value: value.to_string(),
    })
}
