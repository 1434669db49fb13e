//! Fast encoder/decoder for the [QOI image format](https://qoiformat.org/)
//! (Quite OK Image format), written in pure safe Rust.
//!
//! The codec compresses a raster of 8-bit RGB/RGBA pixels losslessly with
//! per-pixel delta prediction, a 64-entry recently-seen-color cache and
//! run-length coding. Encoding and decoding are exact inverses: any stream
//! this encoder produces decodes back to the original pixels, and any
//! stream that couldn't have come from a conforming encoder is rejected.
//!
//! ### Examples
//!
//! ```rust
//! use quiteok::{encode_to_vec, decode_to_vec, ColorSpace};
//!
//! let pixels = vec![0x77; 100 * 100 * 4];
//! let encoded = encode_to_vec(&pixels, 100, 100, 4, ColorSpace::Srgb)?;
//! let (header, decoded) = decode_to_vec(&encoded)?;
//!
//! assert_eq!(header.width, 100);
//! assert_eq!(decoded, pixels);
//! # Ok::<(), quiteok::Error>(())
//! ```
//!
//! Decoded pixels are always widened to 4 channels; when a 3-channel image
//! is decoded, alpha is reported as 255. The returned [`Header`] carries
//! the channel count declared by the stream.
//!
//! ### Features
//!
//! - `std` (default): `Vec`-based APIs, `std::error::Error`, stream output.
//! - `alloc`: `Vec`-based APIs without `std`.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(
    clippy::inline_always,
    clippy::similar_names,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::cargo_common_metadata
)]
#![cfg_attr(not(any(feature = "std", test)), no_std)]

#[cfg(all(feature = "alloc", not(any(feature = "std", test))))]
extern crate alloc;

mod decode;
mod encode;
mod error;
mod header;
mod pixel;
mod types;
mod utils;

#[doc(hidden)]
pub mod consts;

#[cfg(any(feature = "std", feature = "alloc"))]
pub use crate::decode::decode_to_vec;
pub use crate::decode::{decode_header, decode_to_buf, Decoder};
#[cfg(any(feature = "std", feature = "alloc"))]
pub use crate::encode::encode_to_vec;
pub use crate::encode::{encode_max_len, encode_to_buf, Encoder};
pub use crate::error::{Error, Result};
pub use crate::header::Header;
pub use crate::types::{Channels, ColorSpace};
