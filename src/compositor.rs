//! Stitching captured tiles onto one canvas

use crate::capture::Tile;
use crate::geometry::Dimension;
use crate::{Error, Result};
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ImageEncoder, ImageFormat, RgbaImage};
use log::debug;

/// Places tiles at `scale` times their document position on a fresh canvas.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    scale: u32,
    resize_tiles: bool,
}

impl Compositor {
    pub fn new(scale: u32, resize_tiles: bool) -> Self {
        Self { scale, resize_tiles }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Composite `tiles` in order onto a canvas of `document * scale`.
    ///
    /// Later tiles overwrite earlier ones where they overlap. Each tile is
    /// dropped as soon as it is placed. The first error (from the tile source or
    /// from decoding) aborts and discards the canvas.
    pub fn composite<I>(&self, document: Dimension, tiles: I) -> Result<RgbaImage>
    where
        I: IntoIterator<Item = Result<Tile>>,
    {
        let size = document.scaled(self.scale)?;
        let mut canvas = RgbaImage::new(size.width, size.height);

        for (index, tile) in tiles.into_iter().enumerate() {
            let tile = tile?;
            let rect = tile.rect;
            let mut raster = image::load_from_memory_with_format(&tile.png, ImageFormat::Png)
                .map_err(|source| Error::TileDecode { index, rect, source })?
                .to_rgba8();

            // The capture shows the whole viewport; anything past the document
            // edge is clipped by the canvas.
            let target = tile.viewport.scaled(self.scale)?;
            if self.resize_tiles && raster.dimensions() != (target.width, target.height) {
                debug!(
                    "resampling tile {} from {:?} to {}x{}",
                    index,
                    raster.dimensions(),
                    target.width,
                    target.height
                );
                raster = imageops::resize(&raster, target.width, target.height, FilterType::Triangle);
            }

            let x = i64::from(rect.left) * i64::from(self.scale);
            let y = i64::from(rect.top) * i64::from(self.scale);
            drop(tile);
            imageops::replace(&mut canvas, &raster, x, y);
        }

        Ok(canvas)
    }
}

/// Encode a canvas as PNG bytes.
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>> {
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 {
        return Err(Error::EncodeError(format!("cannot encode an empty {}x{} canvas", w, h)));
    }
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(canvas.as_raw(), w, h, image::ExtendedColorType::Rgba8)
        .map_err(|e| Error::EncodeError(format!("PNG encoding failed: {}", e)))?;
    Ok(png)
}
