use core::mem;

use crate::buffer::ExposedMut;
use crate::env::{abort, Host};

/// The arguments of one call, received from the host in a single buffer.
#[derive(Debug)]
pub struct ArgumentBuffer<const N: usize> {
    lengths: [usize; N],
    bytes: Vec<u8>,
}

impl<const N: usize> ArgumentBuffer<N> {
    /// Allocates room for `lengths` and lets the host fill it.
    ///
    /// A function without arguments does not hand anything to the host.
    /// Declared lengths whose sum does not fit in memory abort the call.
    pub fn receive<H: Host + ?Sized>(host: &H, lengths: [usize; N]) -> Self {
        let Some(total) = total_len(&lengths) else {
            abort("declared argument lengths overflow")
        };

        let mut bytes = vec![0; total];

        if N > 0 {
            host.write_args(ExposedMut::new(&mut bytes));
        }

        Self { lengths, bytes }
    }

    #[must_use]
    pub const fn lengths(&self) -> &[usize; N] {
        &self.lengths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Slices the buffer into the declared arguments, in declaration order.
    ///
    /// Argument `i` covers `[sum(lengths[..i]), sum(lengths[..=i]))`; the
    /// slices borrow the buffer and never overlap.
    pub fn split(&mut self) -> [&mut [u8]; N] {
        let lengths = self.lengths;
        let mut rest: &mut [u8] = &mut self.bytes;

        lengths.map(|len| {
            let (arg, tail) = mem::take(&mut rest).split_at_mut(len);
            rest = tail;
            arg
        })
    }
}

/// Sum of the declared lengths, `None` on overflow.
#[must_use]
pub fn total_len(lengths: &[usize]) -> Option<usize> {
    lengths
        .iter()
        .try_fold(0_usize, |total, &len| total.checked_add(len))
}
