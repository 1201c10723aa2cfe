mod tensor;

pub use tensor::Tensor;
pub(crate) use tensor::try_filled;
