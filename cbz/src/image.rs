use std::{
    fmt::Display,
    fs::File,
    io::BufWriter,
    path::Path,
};

use image::{
    codecs::jpeg::JpegEncoder, io::Reader as ImageReader, ColorType, DynamicImage,
    GenericImage, ImageBuffer, ImageFormat, Rgb,
};
use tracing::debug;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ReadingOrder {
    Rtl,
    Ltr,
}

impl Display for ReadingOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Ltr => "ltr",
                Self::Rtl => "rtl",
            }
        )
    }
}

#[derive(Debug, PartialEq)]
pub struct Image {
    dynamic_image: DynamicImage,
}

impl Image {
    /// ## Errors
    ///
    /// Fails if the image can't be open or decoded
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let reader = ImageReader::open(&path)?.with_guessed_format()?;
        Ok(Self::from_dynamic_image(reader.decode()?))
    }

    fn from_dynamic_image(dynamic_image: DynamicImage) -> Self {
        Self { dynamic_image }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.dynamic_image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.dynamic_image.height()
    }

    #[must_use]
    pub fn is_landscape(&self) -> bool {
        self.width() >= self.height()
    }

    /// Splits a spread in its two halves, returned in reading order.
    /// On odd widths the extra column goes to the right half.
    #[must_use]
    pub fn split(&self, reading_order: ReadingOrder) -> (Image, Image) {
        let half = self.width() / 2;
        let left = Self::from_dynamic_image(self.dynamic_image.crop_imm(0, 0, half, self.height()));
        let right = Self::from_dynamic_image(self.dynamic_image.crop_imm(
            half,
            0,
            self.width() - half,
            self.height(),
        ));
        match reading_order {
            ReadingOrder::Ltr => (left, right),
            ReadingOrder::Rtl => (right, left),
        }
    }

    /// Joins pages side by side into one spread, `pages` being given in reading order.
    /// Pages are top aligned, shorter ones are padded with white.
    ///
    /// ## Errors
    ///
    /// Fails if `pages` is empty or the joined canvas can't be drawn
    pub fn join(pages: &[Image], reading_order: ReadingOrder) -> Result<Self> {
        if pages.is_empty() {
            return Err(Error::ImageJoinEmpty);
        }

        let width: u32 = pages.iter().map(Image::width).sum();
        let height = pages.iter().map(Image::height).max().unwrap_or_default();
        let mut canvas = ImageBuffer::from_pixel(width, height, Rgb([255_u8, 255, 255]));

        let ordered: Vec<&Image> = match reading_order {
            ReadingOrder::Ltr => pages.iter().collect(),
            ReadingOrder::Rtl => pages.iter().rev().collect(),
        };

        let mut x = 0;
        for page in ordered {
            canvas.copy_from(&page.dynamic_image.to_rgb8(), x, 0)?;
            x += page.width();
        }
        debug!("joined {} pages into a {width}x{height} spread", pages.len());

        Ok(Self::from_dynamic_image(DynamicImage::ImageRgb8(canvas)))
    }

    /// Saves the image, the format is deduced from the path extension.
    /// `quality` only applies to jpeg output.
    ///
    /// ## Errors
    ///
    /// Fails if the format is unknown or the file can't be written
    pub fn save(&self, path: impl AsRef<Path>, quality: u8) -> Result<()> {
        let format = ImageFormat::from_path(path.as_ref())?;
        if format == ImageFormat::Jpeg {
            let mut writer = BufWriter::new(File::create(path.as_ref())?);
            let rgb = self.dynamic_image.to_rgb8();
            JpegEncoder::new_with_quality(&mut writer, quality).encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ColorType::Rgb8,
            )?;
        } else {
            self.dynamic_image.save_with_format(path.as_ref(), format)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use image::{GenericImageView, Rgb};

    use super::*;

    fn solid(width: u32, height: u32, color: [u8; 3]) -> Image {
        Image::from_dynamic_image(DynamicImage::ImageRgb8(ImageBuffer::from_pixel(
            width,
            height,
            Rgb(color),
        )))
    }

    #[test]
    fn split_follows_reading_order() {
        let mut canvas = ImageBuffer::from_pixel(4, 2, Rgb([0_u8, 0, 0]));
        canvas.put_pixel(3, 0, Rgb([255, 0, 0]));
        let spread = Image::from_dynamic_image(DynamicImage::ImageRgb8(canvas));

        let (first, second) = spread.split(ReadingOrder::Rtl);
        assert_eq!((first.width(), first.height()), (2, 2));
        assert_eq!(second.width(), 2);
        assert_eq!(first.dynamic_image.get_pixel(1, 0).0, [255, 0, 0, 255]);

        let (first, _) = spread.split(ReadingOrder::Ltr);
        assert_eq!(first.dynamic_image.get_pixel(1, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn join_pads_and_orders() {
        let right = solid(3, 4, [255, 0, 0]);
        let left = solid(2, 2, [0, 0, 255]);

        let spread = Image::join(&[right, left], ReadingOrder::Rtl).unwrap();
        assert_eq!((spread.width(), spread.height()), (5, 4));
        assert!(spread.is_landscape());
        assert_eq!(spread.dynamic_image.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(spread.dynamic_image.get_pixel(0, 3).0, [255, 255, 255, 255]);
        assert_eq!(spread.dynamic_image.get_pixel(4, 3).0, [255, 0, 0, 255]);
    }

    #[test]
    fn join_requires_pages() {
        assert!(matches!(
            Image::join(&[], ReadingOrder::Ltr),
            Err(Error::ImageJoinEmpty)
        ));
    }
}
