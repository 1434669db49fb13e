#![allow(dead_code)]

/// Reference cache-slot hash, kept independent from the crate internals.
pub fn hash<const N: usize>(px: [u8; N]) -> u8 {
    let r = px[0].wrapping_mul(3);
    let g = px[1].wrapping_mul(5);
    let b = px[2].wrapping_mul(7);
    let a = if N >= 4 { px[3] } else { 0xff }.wrapping_mul(11);
    r.wrapping_add(g).wrapping_add(b).wrapping_add(a) % 64
}

/// Expands channel-interleaved pixels to 4 channels with alpha = 255.
pub fn to_rgba(data: &[u8], channels: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / channels * 4);
    for px in data.chunks_exact(channels) {
        out.extend_from_slice(px);
        if channels == 3 {
            out.push(0xff);
        }
    }
    out
}
