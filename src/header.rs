use core::convert::TryFrom;

use crate::consts::{QOI_HEADER_SIZE, QOI_MAGIC, QOI_PIXELS_MAX};
use crate::error::{Error, Result};
use crate::types::{Channels, ColorSpace};
use crate::utils::unlikely;

const fn u32_from_be(v: &[u8]) -> u32 {
    ((v[0] as u32) << 24) | ((v[1] as u32) << 16) | ((v[2] as u32) << 8) | (v[3] as u32)
}

/// Image header: dimensions, number of channels, color space.
///
/// Serialized as 14 bytes: the `qoif` magic, big-endian width and height,
/// then one byte each for channels and color space.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of 8-bit channels per pixel
    pub channels: Channels,
    /// Color space (informative field, doesn't affect encoding)
    pub colorspace: ColorSpace,
}

impl Default for Header {
    #[inline]
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            channels: Channels::default(),
            colorspace: ColorSpace::default(),
        }
    }
}

impl Header {
    /// Creates a new header and validates image dimensions.
    #[inline]
    pub fn try_new(
        width: u32, height: u32, channels: Channels, colorspace: ColorSpace,
    ) -> Result<Self> {
        let n_pixels = (width as usize).saturating_mul(height as usize);
        if unlikely(n_pixels == 0) {
            return Err(Error::EmptyImage { width, height });
        } else if unlikely(n_pixels > QOI_PIXELS_MAX) {
            return Err(Error::ImageTooLarge { width, height });
        }
        Ok(Self { width, height, channels, colorspace })
    }

    /// Serializes the header into a byte array.
    #[inline]
    pub fn encode(&self) -> [u8; QOI_HEADER_SIZE] {
        let mut out = [0; QOI_HEADER_SIZE];
        out[..4].copy_from_slice(&QOI_MAGIC.to_be_bytes());
        out[4..8].copy_from_slice(&self.width.to_be_bytes());
        out[8..12].copy_from_slice(&self.height.to_be_bytes());
        out[12] = self.channels.as_u8();
        out[13] = self.colorspace.as_u8();
        out
    }

    /// Deserializes the header from a byte slice and validates every field.
    #[inline]
    pub fn decode(data: impl AsRef<[u8]>) -> Result<Self> {
        let data = data.as_ref();
        if unlikely(data.len() < QOI_HEADER_SIZE) {
            return Err(Error::InputBufferTooSmall { size: data.len(), required: QOI_HEADER_SIZE });
        }
        let magic = u32_from_be(&data[..4]);
        if unlikely(magic != QOI_MAGIC) {
            return Err(Error::InvalidMagic { magic });
        }
        let width = u32_from_be(&data[4..8]);
        let height = u32_from_be(&data[8..12]);
        let channels = Channels::try_from(data[12])?;
        let colorspace = ColorSpace::try_from(data[13])?;
        Self::try_new(width, height, channels, colorspace)
    }

    /// Total number of pixels in the image.
    #[inline]
    pub const fn n_pixels(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Total number of bytes in the raw pixel array, in the source layout.
    #[inline]
    pub const fn n_bytes(&self) -> usize {
        self.n_pixels() * self.channels.as_u8() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_encode_decode_roundtrip() -> Result<()> {
        let header = Header::try_new(1920, 1080, Channels::Rgba, ColorSpace::Linear)?;
        let bytes = header.encode();
        assert_eq!(&bytes[..4], b"qoif");
        assert_eq!(Header::decode(bytes)?, header);
        Ok(())
    }

    #[test]
    fn test_header_rejects_zero_dimensions() {
        assert!(matches!(
            Header::try_new(0, 13, Channels::Rgb, ColorSpace::Srgb),
            Err(Error::EmptyImage { .. })
        ));
        assert!(matches!(
            Header::try_new(13, 0, Channels::Rgb, ColorSpace::Srgb),
            Err(Error::EmptyImage { .. })
        ));
    }

    #[test]
    fn test_header_rejects_oversized_image() {
        assert!(matches!(
            Header::try_new(100_000, 100_000, Channels::Rgb, ColorSpace::Srgb),
            Err(Error::ImageTooLarge { .. })
        ));
    }
}
