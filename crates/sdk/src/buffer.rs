//! Guest buffers while they are handed over to the host.
//!
//! An exposed buffer borrows the memory it describes, so the owner can neither
//! grow, shrink nor drop it until the handoff has returned.

/// Read-only view of a buffer the host is about to read.
#[derive(Debug)]
pub struct Exposed<'a> {
    bytes: &'a [u8],
}

impl<'a> Exposed<'a> {
    #[inline]
    pub(crate) const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Offset of the first byte inside linear memory.
    #[inline]
    #[must_use]
    pub fn address(&self) -> usize {
        self.bytes.as_ptr() as usize
    }

    #[inline]
    #[must_use]
    pub const fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn as_slice(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Writable view of a buffer the host is about to fill.
#[derive(Debug)]
pub struct ExposedMut<'a> {
    bytes: &'a mut [u8],
}

impl<'a> ExposedMut<'a> {
    #[inline]
    pub(crate) fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }

    /// Offset of the first byte inside linear memory.
    #[inline]
    #[must_use]
    pub fn address(&self) -> usize {
        self.bytes.as_ptr() as usize
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr()
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut *self.bytes
    }
}
