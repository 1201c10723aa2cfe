//! Reference network topologies.

mod alexnet;
mod lenet;
mod qcad;

pub use alexnet::{alexnet, alexnet_with, ALEXNET_INPUT};
pub use lenet::{lenet, lenet_with, LENET_INPUT};
pub use qcad::{qcad, qcad_with};
