/// Fully-connected layer.
mod linear;
/// 1D and 2D convolution layers.
mod conv;
/// Max pooling.
mod pool;
/// CHW to vector reshaping.
mod flatten;
/// Mode-tagged weight storage.
mod weights;

pub use conv::{Conv1d, Conv2d};
pub use flatten::{flatten, Flatten};
pub use linear::Linear;
pub use pool::{max_pool2d, max_pool2d_k, MaxPool2d};
pub use weights::Weights;

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Error, Result};
use crate::loader;
use crate::tensor::Tensor;

/// Identifies the type of a network stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerType {
    Linear,
    Conv1d,
    Conv2d,
    MaxPool2d,
    Flatten,
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerType::Linear => write!(f, "Linear"),
            LayerType::Conv1d => write!(f, "Conv1d"),
            LayerType::Conv2d => write!(f, "Conv2d"),
            LayerType::MaxPool2d => write!(f, "MaxPool2d"),
            LayerType::Flatten => write!(f, "Flatten"),
        }
    }
}

/// A stage of a [`Network`].
///
/// Forward passes consume the input tensor and return a new one. Stages
/// without weights read nothing from a weight file.
pub trait Layer: Send + Sync {
    fn layer_type(&self) -> LayerType;
    fn forward(&self, input: Tensor) -> Result<Tensor>;
    fn weight_memory_bytes(&self) -> usize;
    fn read_weights(&mut self, reader: &mut dyn Read) -> Result<()>;
}

struct Stage {
    name: String,
    layer: Box<dyn Layer>,
}

/// A sequential network of named stages.
#[derive(Default)]
pub struct Network {
    stages: Vec<Stage>,
}

impl Network {
    pub fn new() -> Self {
        Network { stages: Vec::new() }
    }

    pub fn add(&mut self, name: impl Into<String>, layer: impl Layer + 'static) {
        self.stages.push(Stage {
            name: name.into(),
            layer: Box::new(layer),
        });
    }

    /// Builder-style [`Network::add`].
    pub fn with(mut self, name: impl Into<String>, layer: impl Layer + 'static) -> Self {
        self.add(name, layer);
        self
    }

    /// Load every stage's weights from a file, in network order.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut reader = loader::open(path)?;
        self.load_from(&mut *reader)?;
        let mut extra = [0u8; 1];
        if reader.read(&mut extra)? != 0 {
            return Err(Error::shape_mismatch("end of weight file", "trailing bytes"));
        }
        debug!(path = %path.display(), "weights loaded");
        Ok(())
    }

    pub fn load_from(&mut self, reader: &mut dyn Read) -> Result<()> {
        for stage in self.stages.iter_mut() {
            stage.layer.read_weights(reader)?;
            debug!(name = %stage.name, layer = %stage.layer.layer_type(), "loaded weights");
        }
        Ok(())
    }

    pub fn predict(&self, input: Tensor) -> Result<Tensor> {
        let mut cur = input;
        for stage in &self.stages {
            cur = stage.layer.forward(cur)?;
            debug!(name = %stage.name, layer = %stage.layer.layer_type(), shape = %cur, "forward");
        }
        Ok(cur)
    }

    /// Like [`Network::predict`], also returning the wall time of every stage.
    pub fn predict_timed(&self, input: Tensor) -> Result<(Tensor, Vec<(LayerType, Duration)>)> {
        let mut timings = Vec::with_capacity(self.stages.len());
        let mut cur = input;
        for stage in &self.stages {
            let start = Instant::now();
            cur = stage.layer.forward(cur)?;
            timings.push((stage.layer.layer_type(), start.elapsed()));
        }
        Ok((cur, timings))
    }

    pub fn num_layers(&self) -> usize {
        self.stages.len()
    }

    /// `(name, type)` of every stage in order.
    pub fn layers(&self) -> impl Iterator<Item = (&str, LayerType)> + '_ {
        self.stages.iter().map(|s| (s.name.as_str(), s.layer.layer_type()))
    }

    pub fn layer_weight_memory(&self) -> Vec<usize> {
        self.stages.iter().map(|s| s.layer.weight_memory_bytes()).collect()
    }

    pub fn weight_memory_bytes(&self) -> usize {
        self.layer_weight_memory().iter().sum()
    }
}
