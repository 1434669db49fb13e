use core::convert::Infallible;
use core::fmt::{self, Display};

use crate::consts::{QOI_MAGIC, QOI_PIXELS_MAX};

/// Errors that can occur during encoding or decoding.
///
/// There are two kinds of failures: invalid arguments handed to the encoder
/// (`InvalidChannels`, `EmptyImage`, `ImageTooLarge`, `InvalidImageLength`,
/// `OutputBufferTooSmall`) and malformed QOI streams seen by the decoder
/// (`InvalidMagic`, `InvalidColorSpace`, `InputBufferTooSmall`,
/// `UnexpectedBufferEnd`, `InvalidPadding`). A malformed stream never yields
/// a partially decoded image.
#[derive(Debug)]
pub enum Error {
    /// Invalid number of channels (must be 3 or 4).
    InvalidChannels { channels: u8 },
    /// Invalid color space value (must be 0 or 1).
    InvalidColorSpace { colorspace: u8 },
    /// Image contains no pixels (zero width or height).
    EmptyImage { width: u32, height: u32 },
    /// Total number of pixels exceeds the supported maximum.
    ImageTooLarge { width: u32, height: u32 },
    /// Pixel buffer length doesn't match `width * height * channels`.
    InvalidImageLength { size: usize, width: u32, height: u32 },
    /// Input buffer can't possibly contain a full QOI stream.
    InputBufferTooSmall { size: usize, required: usize },
    /// Output buffer is smaller than the worst-case encoded size.
    OutputBufferTooSmall { size: usize, required: usize },
    /// Stream doesn't start with the `qoif` magic.
    InvalidMagic { magic: u32 },
    /// Op stream ended before the declared number of pixels was produced.
    UnexpectedBufferEnd,
    /// The 8-byte end marker is missing or corrupted.
    InvalidPadding,
    /// Generic I/O error (stream encoding only).
    #[cfg(feature = "std")]
    IoError(std::io::Error),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::InvalidChannels { channels } => {
                write!(f, "invalid number of channels: {}", channels)
            }
            Self::InvalidColorSpace { colorspace } => {
                write!(f, "invalid color space: {} (expected 0 or 1)", colorspace)
            }
            Self::EmptyImage { width, height } => {
                write!(f, "image contains no pixels: {}x{}", width, height)
            }
            Self::ImageTooLarge { width, height } => {
                let mp = QOI_PIXELS_MAX / 1_000_000;
                write!(f, "image is too large: {}x{} (max={}Mp)", width, height, mp)
            }
            Self::InvalidImageLength { size, width, height } => {
                write!(f, "invalid image length: {} bytes for {}x{}", size, width, height)
            }
            Self::InputBufferTooSmall { size, required } => {
                write!(f, "input buffer size too small: {} (minimum required: {})", size, required)
            }
            Self::OutputBufferTooSmall { size, required } => {
                write!(f, "output buffer size too small: {} (minimum required: {})", size, required)
            }
            Self::InvalidMagic { magic } => {
                write!(
                    f,
                    "invalid magic: expected {:?}, got {:?}",
                    QOI_MAGIC.to_be_bytes(),
                    magic.to_be_bytes()
                )
            }
            Self::UnexpectedBufferEnd => {
                write!(f, "unexpected input buffer end while decoding")
            }
            Self::InvalidPadding => {
                write!(f, "invalid padding (stream end marker)")
            }
            #[cfg(feature = "std")]
            Self::IoError(ref err) => {
                write!(f, "i/o error: {}", err)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<Infallible> for Error {
    fn from(_: Infallible) -> Self {
        unreachable!()
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}
