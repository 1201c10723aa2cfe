use std::fmt;

use crate::error::{Error, Result};

/// Reserve and fill a buffer of `len` elements, reporting allocation failure
/// instead of aborting.
pub(crate) fn try_filled<T: Clone>(what: &'static str, len: usize, value: T) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::Allocation { what, elements: len })?;
    buf.resize(len, value);
    Ok(buf)
}

/// A channel-major activation tensor.
///
/// Layout is CHW: 2D activations are `[c, h, w]`, 1D sequences are stored as
/// `[c, 1, len]` and linear-layer vectors as `[c, 1, 1]`. The tensor owns its
/// buffer; forward passes take it by value and hand back a new one. The shape
/// only changes through [`Tensor::reshape`], so `c * h * w` always equals the
/// buffer length.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    c: usize,
    h: usize,
    w: usize,
    data: Vec<f32>,
}

impl Tensor {
    /// Zero-filled tensor. Aborts on allocation failure; use
    /// [`Tensor::try_new`] where the size comes from untrusted input.
    pub fn new(c: usize, h: usize, w: usize) -> Self {
        Tensor {
            c,
            h,
            w,
            data: vec![0.0; c * h * w],
        }
    }

    pub fn try_new(c: usize, h: usize, w: usize) -> Result<Self> {
        Ok(Tensor {
            c,
            h,
            w,
            data: try_filled("tensor", c * h * w, 0.0f32)?,
        })
    }

    pub fn empty() -> Self {
        Tensor::new(0, 0, 0)
    }

    /// Vector of `c` values, the layout linear layers consume.
    pub fn new1(c: usize) -> Self {
        Tensor::new(c, 1, 1)
    }

    /// `c` channels of a length-`len` sequence, the layout 1D convolutions consume.
    pub fn new2(c: usize, len: usize) -> Self {
        Tensor::new(c, 1, len)
    }

    pub fn from_vec(c: usize, h: usize, w: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != c * h * w {
            return Err(Error::shape_mismatch(
                format!("{} elements for {}x{}x{}", c * h * w, c, h, w),
                data.len(),
            ));
        }
        Ok(Tensor { c, h, w, data })
    }

    pub fn c(&self) -> usize {
        self.c
    }

    pub fn h(&self) -> usize {
        self.h
    }

    pub fn w(&self) -> usize {
        self.w
    }

    /// `(c, h, w)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.c, self.h, self.w)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn fill(&mut self, val: f32) {
        self.data.fill(val);
    }

    #[inline]
    fn index(&self, c: usize, h: usize, w: usize) -> usize {
        c * self.h * self.w + h * self.w + w
    }

    pub fn get(&self, c: usize, h: usize, w: usize) -> f32 {
        self.data[self.index(c, h, w)]
    }

    pub fn set(&mut self, c: usize, h: usize, w: usize, val: f32) {
        let idx = self.index(c, h, w);
        self.data[idx] = val;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Reinterpret the buffer under a new shape with the same element count.
    pub fn reshape(self, c: usize, h: usize, w: usize) -> Result<Self> {
        Tensor::from_vec(c, h, w, self.data)
    }

    /// Spatial size of one channel.
    pub fn plane(&self) -> usize {
        self.h * self.w
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.c, self.h, self.w)
    }
}
