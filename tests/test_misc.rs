mod common;

use quiteok::{
    consts::{QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN},
    decode_header, decode_to_vec, encode_max_len, encode_to_vec, Channels, ColorSpace, Decoder,
    Encoder, Error, Header, Result,
};

use self::common::{hash, to_rgba};

const ONE_PIXEL_QOI_IMAGE: [u8; 23] = [
    0x71, 0x6f, 0x69, 0x66, // magic
    0x00, 0x00, 0x00, 0x01, // width
    0x00, 0x00, 0x00, 0x01, // height
    0x04, // number of channels
    0x00, // colorspace
    0x55, // QOI_OP_DIFF
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, // padding
];

const ONE_PIXEL_QOI_HEADER: Header =
    Header { width: 1, height: 1, channels: Channels::Rgba, colorspace: ColorSpace::Srgb };

#[test]
fn test_decode_to_exact_sized_buffer() -> Result<()> {
    let decoder = Decoder::new(&ONE_PIXEL_QOI_IMAGE[..])?;
    assert_eq!(decoder.header(), &ONE_PIXEL_QOI_HEADER);

    let mut out = vec![0_u8; decoder.required_buf_len()];
    let n_written = decoder.decode_to_buf(&mut out)?;
    assert_eq!(n_written, 4);
    // 0x55 applies (-1, -1, -1) to the starting pixel (0, 0, 0, 255)
    assert_eq!(out, vec![0xff; 4]);
    Ok(())
}

#[test]
fn test_decode_to_larger_buffer() -> Result<()> {
    let decoder = Decoder::new(&ONE_PIXEL_QOI_IMAGE[..])?;
    let mut out = vec![0_u8; decoder.required_buf_len() + 16];
    let n_written = decoder.decode_to_buf(&mut out)?;
    assert_eq!(n_written, 4);
    assert_eq!(&out[4..], &[0_u8; 16]);
    Ok(())
}

#[test]
fn test_decoder_rejects_short_input() {
    let arr = [0_u8];
    assert!(matches!(Decoder::new(&arr[..]), Err(Error::InputBufferTooSmall { .. })));
}

#[test]
fn test_start_with_qoi_op_run() -> Result<()> {
    let header = Header::try_new(3, 1, Channels::Rgba, ColorSpace::Linear)?;
    let mut qoi_data: Vec<_> = header.encode().into_iter().collect();
    qoi_data.extend([QOI_OP_RUN | 1, QOI_OP_RGB, 10, 20, 30]);
    qoi_data.extend([0; 7]);
    qoi_data.push(1);
    let (_, decoded) = decode_to_vec(&qoi_data)?;
    assert_eq!(decoded, vec![0, 0, 0, 255, 0, 0, 0, 255, 10, 20, 30, 255]);
    Ok(())
}

#[test]
fn test_roundtrip_rgb_expands_alpha() -> Result<()> {
    let pixels = [1, 2, 3, 4, 5, 6, 200, 100, 50];
    let encoded = encode_to_vec(pixels, 3, 1, 3, ColorSpace::Srgb)?;
    let (header, decoded) = decode_to_vec(&encoded)?;
    assert_eq!(header.width, 3);
    assert_eq!(header.height, 1);
    assert_eq!(header.channels, Channels::Rgb);
    assert_eq!(header.colorspace, ColorSpace::Srgb);
    assert_eq!(decoded, to_rgba(&pixels, 3));
    Ok(())
}

#[test]
fn test_decode_is_idempotent() -> Result<()> {
    let pixels = [9_u8, 8, 7, 255, 1, 1, 1, 128, 9, 8, 7, 255];
    let encoded = encode_to_vec(pixels, 3, 1, 4, ColorSpace::Srgb)?;
    let first = decode_to_vec(&encoded)?;
    let second = decode_to_vec(&encoded)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_reject_bad_magic() -> Result<()> {
    let mut encoded = encode_to_vec([1, 2, 3], 1, 1, 3, ColorSpace::Srgb)?;
    encoded[0] = b'Q';
    assert!(matches!(decode_to_vec(&encoded), Err(Error::InvalidMagic { .. })));
    Ok(())
}

#[test]
fn test_reject_bad_channels_byte() -> Result<()> {
    let mut encoded = encode_to_vec([1, 2, 3], 1, 1, 3, ColorSpace::Srgb)?;
    encoded[12] = 5;
    assert!(matches!(decode_to_vec(&encoded), Err(Error::InvalidChannels { channels: 5 })));
    assert!(matches!(decode_header(&encoded), Err(Error::InvalidChannels { channels: 5 })));
    Ok(())
}

#[test]
fn test_reject_bad_colorspace_byte() -> Result<()> {
    let mut encoded = encode_to_vec([1, 2, 3], 1, 1, 3, ColorSpace::Srgb)?;
    encoded[13] = 2;
    assert!(matches!(decode_to_vec(&encoded), Err(Error::InvalidColorSpace { colorspace: 2 })));
    Ok(())
}

#[test]
fn test_reject_corrupted_end_marker() -> Result<()> {
    let pixels = [10_u8, 20, 30, 40, 50, 60];
    let encoded = encode_to_vec(pixels, 2, 1, 3, ColorSpace::Srgb)?;
    assert!(decode_to_vec(&encoded).is_ok());
    let trailer_start = encoded.len() - 8;
    for i in 0..8 {
        let mut corrupted = encoded.clone();
        corrupted[trailer_start + i] ^= 0x37;
        assert!(
            matches!(decode_to_vec(&corrupted), Err(Error::InvalidPadding)),
            "corrupting trailer byte {} must fail decoding",
            i
        );
    }
    Ok(())
}

#[test]
fn test_reject_truncated_stream() -> Result<()> {
    let pixels = [10_u8, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120];
    let encoded = encode_to_vec(pixels, 4, 1, 3, ColorSpace::Srgb)?;
    for cut in 1..=encoded.len() {
        assert!(
            decode_to_vec(&encoded[..encoded.len() - cut]).is_err(),
            "decoding must fail with {} bytes cut off",
            cut
        );
    }
    Ok(())
}

#[test]
fn test_run_length_is_capped_at_62() -> Result<()> {
    // 200 pixels equal to the implicit starting pixel: nothing but run ops
    let pixels = {
        let mut v = vec![0_u8; 200 * 4];
        for px in v.chunks_exact_mut(4) {
            px[3] = 0xff;
        }
        v
    };
    let encoded = encode_to_vec(&pixels, 200, 1, 4, ColorSpace::Srgb)?;
    assert_eq!(encoded.len(), 14 + 4 + 8);
    assert_eq!(
        &encoded[14..18],
        &[QOI_OP_RUN | 61, QOI_OP_RUN | 61, QOI_OP_RUN | 61, QOI_OP_RUN | 13]
    );
    let (_, decoded) = decode_to_vec(&encoded)?;
    assert_eq!(decoded, pixels);
    Ok(())
}

#[test]
fn test_run_flushes_at_last_pixel() -> Result<()> {
    let pixels = vec![0_u8; 70 * 3];
    let encoded = encode_to_vec(&pixels, 70, 1, 3, ColorSpace::Srgb)?;
    // all 70 pixels equal the starting pixel, so the run splits as 62 + 8
    assert_eq!(&encoded[14..16], &[QOI_OP_RUN | 61, QOI_OP_RUN | 7]);
    assert_eq!(encoded.len(), 14 + 2 + 8);
    Ok(())
}

#[test]
fn test_colliding_hash_does_not_fake_an_index_hit() -> Result<()> {
    // same cache slot, different pixels: 3 * 64 is 0 mod 64
    let (a, b) = ([1_u8, 2, 3, 255], [65_u8, 2, 3, 255]);
    assert_eq!(hash(a), hash(b));

    let pixels: Vec<_> = [a, b, a].concat();
    let encoded = encode_to_vec(&pixels, 3, 1, 4, ColorSpace::Srgb)?;
    // luma op for a, then two full RGB literals; never an index op
    assert_eq!(
        &encoded[14..encoded.len() - 8],
        &[0xa2, 0x79, QOI_OP_RGB, 65, 2, 3, QOI_OP_RGB, 1, 2, 3]
    );
    let (_, decoded) = decode_to_vec(&encoded)?;
    assert_eq!(decoded, pixels);
    Ok(())
}

#[test]
fn test_one_pixel_rgb_literal() -> Result<()> {
    let encoded = encode_to_vec([10, 20, 30], 1, 1, 3, ColorSpace::Srgb)?;
    assert_eq!(encoded.len(), 14 + 4 + 8);
    assert_eq!(&encoded[14..18], &[QOI_OP_RGB, 10, 20, 30]);
    let (_, decoded) = decode_to_vec(&encoded)?;
    assert_eq!(decoded, vec![10, 20, 30, 255]);
    Ok(())
}

#[test]
fn test_one_pixel_rgba_literal() -> Result<()> {
    let encoded = encode_to_vec([100, 50, 200, 128], 1, 1, 4, ColorSpace::Srgb)?;
    assert_eq!(encoded.len(), 14 + 5 + 8);
    assert_eq!(&encoded[14..19], &[QOI_OP_RGBA, 100, 50, 200, 128]);
    let (_, decoded) = decode_to_vec(&encoded)?;
    assert_eq!(decoded, vec![100, 50, 200, 128]);
    Ok(())
}

#[test]
fn test_two_pixel_image_single_run_op() -> Result<()> {
    // both pixels equal the implicit starting pixel: one run op of length 2
    let pixels = [0, 0, 0, 255, 0, 0, 0, 255];
    let encoded = encode_to_vec(pixels, 2, 1, 4, ColorSpace::Srgb)?;
    assert_eq!(encoded.len(), 14 + 1 + 8);
    assert_eq!(encoded[14], QOI_OP_RUN | 1);
    let (_, decoded) = decode_to_vec(&encoded)?;
    assert_eq!(decoded, pixels);
    Ok(())
}

#[test]
fn test_two_equal_pixels_op_then_run() -> Result<()> {
    // the first (10,10,10,255) needs its own op; only the second is a run
    let pixels = [10, 10, 10, 255, 10, 10, 10, 255];
    let encoded = encode_to_vec(pixels, 2, 1, 4, ColorSpace::Srgb)?;
    assert_eq!(encoded.len(), 14 + 2 + 1 + 8);
    assert_eq!(encoded[16], QOI_OP_RUN);
    let (_, decoded) = decode_to_vec(&encoded)?;
    assert_eq!(decoded, pixels);
    Ok(())
}

#[test]
fn test_encode_rejects_bad_arguments() {
    assert!(matches!(
        encode_to_vec([0; 8], 0, 2, 4, ColorSpace::Srgb),
        Err(Error::EmptyImage { .. })
    ));
    assert!(matches!(
        encode_to_vec([0; 8], 2, 0, 4, ColorSpace::Srgb),
        Err(Error::EmptyImage { .. })
    ));
    assert!(matches!(
        encode_to_vec([0; 7], 2, 1, 4, ColorSpace::Srgb),
        Err(Error::InvalidImageLength { .. })
    ));
    assert!(matches!(
        encode_to_vec([0; 9], 2, 1, 4, ColorSpace::Srgb),
        Err(Error::InvalidImageLength { .. })
    ));
    assert!(matches!(
        encode_to_vec([0; 8], 2, 1, 5, ColorSpace::Srgb),
        Err(Error::InvalidChannels { channels: 5 })
    ));
}

#[test]
fn test_encode_to_undersized_buffer() -> Result<()> {
    let pixels = [0_u8; 8];
    let encoder = Encoder::new(&pixels, 2, 1, Channels::Rgba, ColorSpace::Srgb)?;
    let mut out = vec![0_u8; encoder.required_buf_len() - 1];
    assert!(matches!(
        encoder.encode_to_buf(&mut out),
        Err(Error::OutputBufferTooSmall { .. })
    ));
    Ok(())
}

#[test]
fn test_encoded_size_is_bounded() -> Result<()> {
    let pixels: Vec<_> = (0..=255_u8).flat_map(|v| [v, v.wrapping_mul(17), !v]).collect();
    let encoded = encode_to_vec(&pixels, 16, 16, 3, ColorSpace::Linear)?;
    assert!(encoded.len() <= encode_max_len(16, 16, 3_u8));
    let (header, _) = decode_to_vec(&encoded)?;
    assert_eq!(header.colorspace, ColorSpace::Linear);
    Ok(())
}

#[cfg(feature = "std")]
#[test]
fn test_encode_to_stream_matches_buf() -> Result<()> {
    let pixels: Vec<_> = (0..64_u8).flat_map(|v| [v, 0, 255 - v, 200]).collect();
    let encoder = Encoder::new(&pixels, 8, 8, Channels::Rgba, ColorSpace::Srgb)?;
    let encoded = encoder.encode_to_vec()?;
    let mut streamed = Vec::new();
    let n_written = encoder.encode_to_stream(&mut streamed)?;
    assert_eq!(n_written, encoded.len());
    assert_eq!(streamed, encoded);
    Ok(())
}
