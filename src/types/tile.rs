//! Decoded pixel buffers and read-only tile views.
//!
//! A `PixelBuffer` owns the decoded bytes of one input image. Tiles are
//! never copied out of it during scanning: a `TileView` borrows the buffer
//! and hands out row slices, so a view can never outlive its image.

/// Width and height of a tile in pixels.
pub const TILE_SIZE: usize = 32;

/// Byte layout of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Two bytes per pixel: luma, alpha. Used for art layers.
    GrayAlpha,
    /// Four bytes per pixel: red, green, blue, alpha. Used for metadata.
    Rgba,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::GrayAlpha => 2,
            PixelFormat::Rgba => 4,
        }
    }

    /// Offset of the alpha byte within a pixel.
    pub const fn alpha_offset(self) -> usize {
        self.bytes_per_pixel() - 1
    }
}

/// 0-based index of a unique tile in the dedup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileIndex(pub u32);

impl TileIndex {
    /// Value written to tile tables. Zero is reserved for blank cells.
    pub fn serialized(self) -> u32 {
        self.0 + 1
    }
}

/// A decoded image with row-major pixel bytes.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw pixel bytes.
    ///
    /// `data` must hold exactly `width * height` pixels in `format`.
    pub fn new(width: usize, height: usize, format: PixelFormat, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height * format.bytes_per_pixel());
        Self {
            width,
            height,
            format,
            data,
        }
    }

    /// Create a fully transparent buffer.
    pub fn transparent(width: usize, height: usize, format: PixelFormat) -> Self {
        Self::new(
            width,
            height,
            format,
            vec![0; width * height * format.bytes_per_pixel()],
        )
    }

    pub fn from_gray_alpha(img: image::GrayAlphaImage) -> Self {
        let (w, h) = img.dimensions();
        Self::new(w as usize, h as usize, PixelFormat::GrayAlpha, img.into_raw())
    }

    pub fn from_rgba(img: image::RgbaImage) -> Self {
        let (w, h) = img.dimensions();
        Self::new(w as usize, h as usize, PixelFormat::Rgba, img.into_raw())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Number of tile columns.
    pub fn grid_width(&self) -> usize {
        self.width / TILE_SIZE
    }

    /// Number of tile rows.
    pub fn grid_height(&self) -> usize {
        self.height / TILE_SIZE
    }

    /// Bytes per image row.
    pub fn row_stride(&self) -> usize {
        self.width * self.format.bytes_per_pixel()
    }

    /// Bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let bpp = self.format.bytes_per_pixel();
        let start = y * self.row_stride() + x * bpp;
        &self.data[start..start + bpp]
    }

    /// Overwrite the pixel at `(x, y)`.
    pub fn put_pixel(&mut self, x: usize, y: usize, bytes: &[u8]) {
        let bpp = self.format.bytes_per_pixel();
        let start = y * self.row_stride() + x * bpp;
        self.data[start..start + bpp].copy_from_slice(bytes);
    }

    /// Fill one tile cell with a single pixel value.
    pub fn fill_tile(&mut self, col: usize, row: usize, bytes: &[u8]) {
        for y in 0..TILE_SIZE {
            for x in 0..TILE_SIZE {
                self.put_pixel(col * TILE_SIZE + x, row * TILE_SIZE + y, bytes);
            }
        }
    }

    /// View of the tile at grid position `(col, row)`.
    pub fn tile(&self, col: usize, row: usize) -> TileView<'_> {
        debug_assert!(col < self.grid_width() && row < self.grid_height());
        TileView {
            buffer: self,
            col,
            row,
        }
    }

    /// All tiles in raster order: top to bottom, left to right.
    pub fn tiles(&self) -> impl Iterator<Item = TileView<'_>> + '_ {
        let cols = self.grid_width();
        (0..self.grid_height())
            .flat_map(move |row| (0..cols).map(move |col| self.tile(col, row)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Read-only view of one tile-sized block inside a `PixelBuffer`.
#[derive(Debug, Clone, Copy)]
pub struct TileView<'a> {
    buffer: &'a PixelBuffer,
    col: usize,
    row: usize,
}

impl<'a> TileView<'a> {
    pub fn col(&self) -> usize {
        self.col
    }

    pub fn row(&self) -> usize {
        self.row
    }

    /// Pixel coordinate of the top-left corner.
    pub fn origin(&self) -> (usize, usize) {
        (self.col * TILE_SIZE, self.row * TILE_SIZE)
    }

    pub fn format(&self) -> PixelFormat {
        self.buffer.format
    }

    /// Bytes of the pixel at block offset `(bx, by)`.
    pub fn pixel(&self, bx: usize, by: usize) -> &'a [u8] {
        let (x, y) = self.origin();
        self.buffer.pixel(x + bx, y + by)
    }

    /// The tile's rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let buffer = self.buffer;
        let stride = buffer.row_stride();
        let bpp = buffer.format.bytes_per_pixel();
        let (x, y) = self.origin();
        let start = y * stride + x * bpp;
        let len = TILE_SIZE * bpp;
        (0..TILE_SIZE).map(move |i| {
            let offset = start + i * stride;
            &buffer.data[offset..offset + len]
        })
    }

    /// True when every pixel's alpha byte is zero.
    pub fn is_blank(&self) -> bool {
        let format = self.format();
        let bpp = format.bytes_per_pixel();
        let alpha = format.alpha_offset();
        self.rows()
            .all(|row| row.iter().skip(alpha).step_by(bpp).all(|&a| a == 0))
    }

    /// Copy the tile's bytes, row after row.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes =
            Vec::with_capacity(TILE_SIZE * TILE_SIZE * self.format().bytes_per_pixel());
        for row in self.rows() {
            bytes.extend_from_slice(row);
        }
        bytes
    }
}
