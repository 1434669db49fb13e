#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Pixel<const N: usize>([u8; N]);

impl<const N: usize> Pixel<N> {
    #[inline]
    pub const fn new() -> Self {
        Self([0; N])
    }

    #[inline]
    pub fn read(&mut self, s: &[u8]) {
        let mut i = 0;
        while i < N {
            self.0[i] = s[i];
            i += 1;
        }
    }

    /// Widens to 4 channels, substituting `with_a` for a missing alpha.
    #[inline]
    pub const fn as_rgba(self, with_a: u8) -> Pixel<4> {
        let mut i = 0;
        let mut out = Pixel::new();
        while i < N {
            out.0[i] = self.0[i];
            i += 1;
        }
        if N < 4 {
            out.0[3] = with_a;
        }
        out
    }

    #[inline]
    pub const fn r(self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub const fn g(self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub const fn with_a(mut self, value: u8) -> Self {
        if N >= 4 {
            self.0[3] = value;
        }
        self
    }

    #[inline]
    pub const fn a_or(self, value: u8) -> u8 {
        if N < 4 {
            value
        } else {
            self.0[3]
        }
    }

    /// Cache slot for this pixel: `(r*3 + g*5 + b*7 + a*11) % 64`.
    #[inline]
    pub const fn hash_index(self) -> u8 {
        let r = self.r().wrapping_mul(3);
        let g = self.g().wrapping_mul(5);
        let b = self.b().wrapping_mul(7);
        let a = self.a_or(0xff).wrapping_mul(11);
        r.wrapping_add(g).wrapping_add(b).wrapping_add(a) % 64
    }

    /// Componentwise signed difference from `prev`, with alpha defaulting
    /// to 255 for 3-channel pixels. Computed over the full channel domain,
    /// no wraparound; the encoder classifies the result afterwards.
    #[inline]
    pub fn delta(self, prev: Self) -> Delta {
        Delta {
            r: i16::from(self.r()) - i16::from(prev.r()),
            g: i16::from(self.g()) - i16::from(prev.g()),
            b: i16::from(self.b()) - i16::from(prev.b()),
            a: i16::from(self.a_or(0xff)) - i16::from(prev.a_or(0xff)),
        }
    }

    #[inline]
    pub fn update_rgb(&mut self, r: u8, g: u8, b: u8) {
        self.0[0] = r;
        self.0[1] = g;
        self.0[2] = b;
    }

    #[inline]
    pub fn update_rgba(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.update_rgb(r, g, b);
        if N >= 4 {
            self.0[3] = a;
        }
    }

    /// Applies the three 2-bit deltas of a diff op (bias -2).
    #[inline]
    pub fn update_diff(&mut self, b1: u8) {
        self.0[0] = self.0[0].wrapping_add(b1 >> 4 & 0x03).wrapping_sub(2);
        self.0[1] = self.0[1].wrapping_add(b1 >> 2 & 0x03).wrapping_sub(2);
        self.0[2] = self.0[2].wrapping_add(b1 & 0x03).wrapping_sub(2);
    }

    /// Applies the 6/4/4-bit deltas of a luma op (biases -32 and -8).
    #[inline]
    pub fn update_luma(&mut self, b1: u8, b2: u8) {
        let vg = (b1 & 0x3f).wrapping_sub(32);
        let vg_8 = vg.wrapping_sub(8);
        let vr = vg_8.wrapping_add(b2 >> 4);
        let vb = vg_8.wrapping_add(b2 & 0x0f);
        self.0[0] = self.0[0].wrapping_add(vr);
        self.0[1] = self.0[1].wrapping_add(vg);
        self.0[2] = self.0[2].wrapping_add(vb);
    }
}

impl<const N: usize> From<Pixel<N>> for [u8; N] {
    #[inline(always)]
    fn from(px: Pixel<N>) -> Self {
        px.0
    }
}

/// Signed distance between two pixels, one component at a time.
#[derive(Copy, Clone, Debug)]
pub struct Delta {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Delta {
    /// True if r, g, b all fit the 2-bit range of a diff op.
    #[inline]
    pub const fn fits_diff(self) -> bool {
        self.r >= -2 && self.r <= 1 && self.g >= -2 && self.g <= 1 && self.b >= -2 && self.b <= 1
    }

    /// True if the green delta fits 6 bits and the red/blue deltas fit
    /// 4 bits each when expressed relative to green.
    #[inline]
    pub const fn fits_luma(self) -> bool {
        let dr_dg = self.r - self.g;
        let db_dg = self.b - self.g;
        self.g >= -32 && self.g <= 31 && dr_dg >= -8 && dr_dg <= 7 && db_dg >= -8 && db_dg <= 7
    }
}

pub trait SupportedChannels {}

impl SupportedChannels for Pixel<3> {}
impl SupportedChannels for Pixel<4> {}

#[cfg(test)]
mod tests {
    use super::Pixel;

    #[test]
    fn test_hash_index_matches_reference() {
        let px = Pixel::<4>::new();
        assert_eq!(px.hash_index(), 0);
        let px = Pixel::<4>::new().with_a(0xff);
        assert_eq!(px.hash_index(), (255_u32 * 11 % 64) as u8);
        let mut px = Pixel::<4>::new();
        px.update_rgba(1, 2, 3, 4);
        assert_eq!(px.hash_index(), ((3 + 10 + 21 + 44) % 64) as u8);
    }

    #[test]
    fn test_rgb_pixel_hashes_with_opaque_alpha() {
        let mut px3 = Pixel::<3>::new();
        px3.read(&[7, 8, 9]);
        assert_eq!(px3.hash_index(), px3.as_rgba(0xff).hash_index());
    }

    #[test]
    fn test_delta_does_not_wrap() {
        let mut px = Pixel::<4>::new().with_a(0xff);
        px.update_rgb(254, 0, 0);
        let prev = Pixel::<4>::new().with_a(0xff);
        let d = px.delta(prev);
        assert_eq!(d.r, 254);
        assert!(!d.fits_diff());
        assert!(!d.fits_luma());
    }
}
