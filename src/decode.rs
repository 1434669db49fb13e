#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{vec, vec::Vec};

use crate::consts::{
    QOI_HEADER_SIZE, QOI_OP_DIFF, QOI_OP_INDEX, QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN,
    QOI_PADDING, QOI_PADDING_SIZE,
};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::pixel::Pixel;
use crate::utils::{unlikely, Bytes};

const QOI_OP_INDEX_END: u8 = QOI_OP_DIFF - 1;
const QOI_OP_DIFF_END: u8 = QOI_OP_LUMA - 1;
const QOI_OP_LUMA_END: u8 = QOI_OP_RUN - 1;
const QOI_OP_RUN_END: u8 = QOI_OP_RGB - 1; // run tags stop short of the two literal tags

fn decode_impl(data: &[u8], out: &mut [u8]) -> Result<()> {
    let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(out);
    let mut buf = Bytes::new(data);

    let mut index = [Pixel::<4>::new(); 64];
    let mut px = Pixel::<4>::new().with_a(0xff);
    let mut run = 0_usize;

    for px_out in pixels.iter_mut() {
        if run != 0 {
            run -= 1;
            *px_out = px.into();
            continue;
        }

        match buf.read_one()? {
            b1 @ QOI_OP_INDEX..=QOI_OP_INDEX_END => {
                // an index hit doesn't refresh the cache slot
                px = index[usize::from(b1)];
                *px_out = px.into();
                continue;
            }
            b1 @ QOI_OP_RUN..=QOI_OP_RUN_END => {
                // the tag stores the remaining repeats of the previous pixel;
                // neither the cache nor the previous pixel change
                run = usize::from(b1 & 0x3f);
                *px_out = px.into();
                continue;
            }
            b1 @ QOI_OP_DIFF..=QOI_OP_DIFF_END => {
                px.update_diff(b1);
            }
            b1 @ QOI_OP_LUMA..=QOI_OP_LUMA_END => {
                let b2 = buf.read_one()?;
                px.update_luma(b1, b2);
            }
            QOI_OP_RGB => {
                let v = buf.read_many(3)?;
                px.update_rgb(v[0], v[1], v[2]);
            }
            QOI_OP_RGBA => {
                let v = buf.read_many(4)?;
                px.update_rgba(v[0], v[1], v[2], v[3]);
            }
        }

        index[usize::from(px.hash_index())] = px;
        *px_out = px.into();
    }

    if unlikely(buf.read_many(QOI_PADDING_SIZE)? != &QOI_PADDING[..]) {
        return Err(Error::InvalidPadding);
    }
    Ok(())
}

/// Decodes only the image header out of a QOI stream.
#[inline]
pub fn decode_header(data: impl AsRef<[u8]>) -> Result<Header> {
    Header::decode(data)
}

/// Decodes a QOI stream into a pre-allocated pixel buffer.
///
/// The buffer must fit `width * height * 4` bytes: decoded pixels are
/// always widened to 4 channels, with alpha set to 255 for 3-channel
/// images. The returned header mirrors the channel count declared by the
/// stream.
#[inline]
pub fn decode_to_buf(buf: impl AsMut<[u8]>, data: impl AsRef<[u8]>) -> Result<Header> {
    let decoder = Decoder::new(&data)?;
    let header = *decoder.header();
    decoder.decode_to_buf(buf)?;
    Ok(header)
}

/// Decodes a QOI stream into a newly allocated vector of RGBA pixels.
///
/// See [`decode_to_buf`] for the output layout.
#[cfg(any(feature = "std", feature = "alloc"))]
#[inline]
pub fn decode_to_vec(data: impl AsRef<[u8]>) -> Result<(Header, Vec<u8>)> {
    let decoder = Decoder::new(&data)?;
    let header = *decoder.header();
    let out = decoder.decode_to_vec()?;
    Ok((header, out))
}

/// Decode QOI streams from in-memory buffers.
pub struct Decoder<'a> {
    data: &'a [u8],
    header: Header,
}

impl<'a> Decoder<'a> {
    /// Parses and validates the stream header, leaving the op stream to be
    /// decoded by one of the `decode_to_*` methods.
    #[inline]
    pub fn new(data: &'a (impl AsRef<[u8]> + ?Sized)) -> Result<Self> {
        let data = data.as_ref();
        if unlikely(data.len() < QOI_HEADER_SIZE + QOI_PADDING_SIZE) {
            return Err(Error::InputBufferTooSmall {
                size: data.len(),
                required: QOI_HEADER_SIZE + QOI_PADDING_SIZE,
            });
        }
        let header = Header::decode(data)?;
        Ok(Self { data: &data[QOI_HEADER_SIZE..], header })
    }

    /// Returns the header of the image being decoded.
    #[inline]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The number of bytes the decoded image will take (always 4 channels).
    ///
    /// Can be used to pre-allocate the buffer for [`Decoder::decode_to_buf`].
    #[inline]
    pub const fn required_buf_len(&self) -> usize {
        self.header.n_pixels().saturating_mul(4)
    }

    /// Decodes the image into the given buffer, returning the number of
    /// bytes written.
    #[inline]
    pub fn decode_to_buf(&self, mut buf: impl AsMut<[u8]>) -> Result<usize> {
        let buf = buf.as_mut();
        let size = self.required_buf_len();
        if unlikely(buf.len() < size) {
            return Err(Error::OutputBufferTooSmall { size: buf.len(), required: size });
        }
        decode_impl(self.data, &mut buf[..size])?;
        Ok(size)
    }

    /// Decodes the image into a newly allocated vector.
    #[cfg(any(feature = "std", feature = "alloc"))]
    #[inline]
    pub fn decode_to_vec(&self) -> Result<Vec<u8>> {
        let mut out = vec![0; self.required_buf_len()];
        self.decode_to_buf(&mut out)?;
        Ok(out)
    }
}
