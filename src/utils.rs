use crate::error::{Error, Result};

#[inline(always)]
#[cold]
pub const fn cold() {}

#[inline(always)]
#[allow(unused)]
pub const fn likely(b: bool) -> bool {
    if !b {
        cold();
    }
    b
}

#[inline(always)]
pub const fn unlikely(b: bool) -> bool {
    if b {
        cold();
    }
    b
}

/// Checked sequential reader over an immutable byte slice.
///
/// Running past the end of the slice is a decoding error (the op stream was
/// truncated), not a panic.
pub struct Bytes<'a>(&'a [u8]);

impl<'a> Bytes<'a> {
    #[inline]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self(buf)
    }

    #[inline]
    pub fn read_one(&mut self) -> Result<u8> {
        if let Some((first, tail)) = self.0.split_first() {
            self.0 = tail;
            Ok(*first)
        } else {
            cold();
            Err(Error::UnexpectedBufferEnd)
        }
    }

    #[inline]
    pub fn read_many(&mut self, n: usize) -> Result<&'a [u8]> {
        if n <= self.0.len() {
            let (head, tail) = self.0.split_at(n);
            self.0 = tail;
            Ok(head)
        } else {
            cold();
            Err(Error::UnexpectedBufferEnd)
        }
    }
}

pub trait Writer: Sized {
    fn write_one(self, v: u8) -> Result<Self>;
    fn write_many(self, v: &[u8]) -> Result<Self>;
    fn capacity(&self) -> usize;
}

/// Sequential writer over a pre-sized mutable byte slice.
///
/// The encoder validates the worst-case capacity up front, so running past
/// the end of the slice is a programming error and panics.
pub struct BytesMut<'a>(&'a mut [u8]);

impl<'a> BytesMut<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self(buf)
    }

    #[inline]
    fn write_one(self, v: u8) -> Self {
        if let Some((first, tail)) = self.0.split_first_mut() {
            *first = v;
            Self(tail)
        } else {
            cold();
            panic!("writing past the end of the output buffer")
        }
    }

    #[inline]
    fn write_many(self, v: &[u8]) -> Self {
        let (head, tail) = self.0.split_at_mut(v.len());
        head.copy_from_slice(v);
        Self(tail)
    }
}

impl<'a> Writer for BytesMut<'a> {
    #[inline]
    fn write_one(self, v: u8) -> Result<Self> {
        Ok(BytesMut::write_one(self, v))
    }

    #[inline]
    fn write_many(self, v: &[u8]) -> Result<Self> {
        Ok(BytesMut::write_many(self, v))
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.0.len()
    }
}

#[cfg(feature = "std")]
pub struct GenericWriter<W> {
    writer: W,
    n_written: usize,
}

#[cfg(feature = "std")]
impl<W: std::io::Write> GenericWriter<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer, n_written: 0 }
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> Writer for GenericWriter<W> {
    #[inline]
    fn write_one(mut self, v: u8) -> Result<Self> {
        self.n_written += 1;
        self.writer.write_all(&[v]).map(|()| self).map_err(Error::from)
    }

    #[inline]
    fn write_many(mut self, v: &[u8]) -> Result<Self> {
        self.n_written += v.len();
        self.writer.write_all(v).map(|()| self).map_err(Error::from)
    }

    #[inline]
    fn capacity(&self) -> usize {
        usize::MAX - self.n_written
    }
}
