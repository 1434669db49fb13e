#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{vec, vec::Vec};
use core::convert::TryFrom;
#[cfg(feature = "std")]
use std::io::Write;

use crate::consts::{
    QOI_HEADER_SIZE, QOI_OP_DIFF, QOI_OP_INDEX, QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN,
    QOI_PADDING, QOI_PADDING_SIZE,
};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::pixel::{Pixel, SupportedChannels};
use crate::types::{Channels, ColorSpace};
#[cfg(feature = "std")]
use crate::utils::GenericWriter;
use crate::utils::{unlikely, BytesMut, Writer};

/// Worst-case encoded stream size for the given image dimensions.
///
/// Every pixel encoded as a literal op plus its tag byte, then the header
/// and the end marker on top.
#[inline]
pub fn encode_max_len(width: u32, height: u32, channels: impl Into<u8>) -> usize {
    let (width, height) = (width as usize, height as usize);
    let n_pixels = width.saturating_mul(height);
    QOI_HEADER_SIZE
        + n_pixels.saturating_mul(usize::from(channels.into()).saturating_add(1))
        + QOI_PADDING_SIZE
}

fn encode_impl<W: Writer, const N: usize>(mut buf: W, data: &[u8]) -> Result<usize>
where
    Pixel<N>: SupportedChannels,
{
    let cap = buf.capacity();
    let n_pixels = data.len() / N;

    let mut index = [Pixel::<4>::new(); 64];
    let mut px_prev = Pixel::<N>::new().with_a(0xff);
    let mut px = Pixel::<N>::new().with_a(0xff);
    let mut run = 0_u8;

    for (i, chunk) in data.chunks_exact(N).enumerate() {
        px.read(chunk);
        if px == px_prev {
            run += 1;
            if run == 62 || unlikely(i == n_pixels - 1) {
                buf = buf.write_one(QOI_OP_RUN | (run - 1))?;
                run = 0;
            }
        } else {
            if run != 0 {
                buf = buf.write_one(QOI_OP_RUN | (run - 1))?;
                run = 0;
            }
            let px_rgba = px.as_rgba(0xff);
            let index_pos = px_rgba.hash_index();
            let index_px = &mut index[usize::from(index_pos)];
            if *index_px == px_rgba {
                buf = buf.write_one(QOI_OP_INDEX | index_pos)?;
            } else {
                *index_px = px_rgba;
                let d = px.delta(px_prev);
                buf = if d.a == 0 {
                    if d.fits_diff() {
                        let (dr, dg, db) = ((d.r + 2) as u8, (d.g + 2) as u8, (d.b + 2) as u8);
                        buf.write_one(QOI_OP_DIFF | dr << 4 | dg << 2 | db)?
                    } else if d.fits_luma() {
                        let (dr_dg, db_dg) = (d.r - d.g, d.b - d.g);
                        buf.write_many(&[
                            QOI_OP_LUMA | (d.g + 32) as u8,
                            ((dr_dg + 8) << 4 | (db_dg + 8)) as u8,
                        ])?
                    } else {
                        buf.write_many(&[QOI_OP_RGB, px.r(), px.g(), px.b()])?
                    }
                } else {
                    buf.write_many(&[QOI_OP_RGBA, px.r(), px.g(), px.b(), px.a_or(0xff)])?
                };
            }
            px_prev = px;
        }
    }

    buf = buf.write_many(&QOI_PADDING)?;
    Ok(cap.saturating_sub(buf.capacity()))
}

#[inline]
fn encode_impl_all<W: Writer>(buf: W, data: &[u8], channels: Channels) -> Result<usize> {
    match channels {
        Channels::Rgb => encode_impl::<_, 3>(buf, data),
        Channels::Rgba => encode_impl::<_, 4>(buf, data),
    }
}

/// Encodes raw pixel data into a pre-allocated output buffer.
///
/// The buffer must be at least [`encode_max_len`] bytes long. Returns the
/// number of bytes actually written.
#[inline]
pub fn encode_to_buf(
    out: impl AsMut<[u8]>, data: impl AsRef<[u8]>, width: u32, height: u32, channels: u8,
    colorspace: impl Into<ColorSpace>,
) -> Result<usize> {
    Encoder::new(&data, width, height, Channels::try_from(channels)?, colorspace.into())?
        .encode_to_buf(out)
}

/// Encodes raw pixel data into a newly allocated vector.
#[cfg(any(feature = "std", feature = "alloc"))]
#[inline]
pub fn encode_to_vec(
    data: impl AsRef<[u8]>, width: u32, height: u32, channels: u8,
    colorspace: impl Into<ColorSpace>,
) -> Result<Vec<u8>> {
    Encoder::new(&data, width, height, Channels::try_from(channels)?, colorspace.into())?
        .encode_to_vec()
}

/// Encode QOI images into buffers, vectors or writable streams.
#[derive(Clone)]
pub struct Encoder<'a> {
    data: &'a [u8],
    header: Header,
}

impl<'a> Encoder<'a> {
    /// Validates the image dimensions against the pixel buffer.
    ///
    /// `data` holds channel-interleaved 8-bit pixels in row-major order and
    /// must be exactly `width * height * channels` bytes long.
    #[inline]
    pub fn new(
        data: &'a (impl AsRef<[u8]> + ?Sized), width: u32, height: u32, channels: Channels,
        colorspace: ColorSpace,
    ) -> Result<Self> {
        let data = data.as_ref();
        let header = Header::try_new(width, height, channels, colorspace)?;
        if unlikely(data.len() != header.n_bytes()) {
            return Err(Error::InvalidImageLength { size: data.len(), width, height });
        }
        Ok(Self { data, header })
    }

    /// Returns the header that will be stored in the encoded image.
    #[inline]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The maximum number of bytes the encoded image will take.
    ///
    /// Can be used to pre-allocate the buffer for [`Encoder::encode_to_buf`].
    #[inline]
    pub fn required_buf_len(&self) -> usize {
        encode_max_len(self.header.width, self.header.height, self.header.channels)
    }

    /// Encodes the image into the given buffer, returning the number of
    /// bytes written.
    #[inline]
    pub fn encode_to_buf(&self, mut out: impl AsMut<[u8]>) -> Result<usize> {
        let out = out.as_mut();
        let size_required = self.required_buf_len();
        if unlikely(out.len() < size_required) {
            return Err(Error::OutputBufferTooSmall { size: out.len(), required: size_required });
        }
        let (head, tail) = out.split_at_mut(QOI_HEADER_SIZE);
        head.copy_from_slice(&self.header.encode());
        let n_written = encode_impl_all(BytesMut::new(tail), self.data, self.header.channels)?;
        Ok(QOI_HEADER_SIZE + n_written)
    }

    /// Encodes the image into a newly allocated vector of exactly the
    /// encoded length.
    #[cfg(any(feature = "std", feature = "alloc"))]
    #[inline]
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut out = vec![0_u8; self.required_buf_len()];
        let size = self.encode_to_buf(&mut out)?;
        out.truncate(size);
        Ok(out)
    }

    /// Encodes the image directly to a generic writer.
    ///
    /// Note: while it's possible to pass a `BufWriter` here, it's better to
    /// use a pre-allocated buffer and [`Encoder::encode_to_buf`] instead.
    #[cfg(feature = "std")]
    #[inline]
    pub fn encode_to_stream<W: Write>(&self, writer: &mut W) -> Result<usize> {
        writer.write_all(&self.header.encode())?;
        let n_written = encode_impl_all(GenericWriter::new(writer), self.data, self.header.channels)?;
        Ok(n_written + QOI_HEADER_SIZE)
    }
}
