//! LeNet-5 latency and memory across FP/TNN/TBN/BNN with random weights.
//!
//! Run with: `RUST_LOG=info cargo run --release --example lenet_bench [iterations]`

use std::io::{self, Read};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bitconv::arc::{lenet, LENET_INPUT};
use bitconv::metrics::{print_report, run_benchmark};
use bitconv::{QuantMode, Tensor};

/// Endless weight stream: uniform f32 in [-1, 1) for FP, random words otherwise.
struct RandomWeights {
    mode: QuantMode,
    rng: StdRng,
}

impl Read for RandomWeights {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.mode.is_quantized() {
            self.rng.fill(buf);
            return Ok(buf.len());
        }
        let whole = buf.len() / 4 * 4;
        for chunk in buf[..whole].chunks_exact_mut(4) {
            let v: f32 = self.rng.gen_range(-1.0..1.0);
            chunk.copy_from_slice(&v.to_le_bytes());
        }
        Ok(whole)
    }
}

fn main() -> bitconv::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let iterations = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(100);

    let (c, h, w) = LENET_INPUT;
    let mut rng = StdRng::seed_from_u64(7);
    let data = (0..c * h * w).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let input = Tensor::from_vec(c, h, w, data)?;

    let result = run_benchmark(
        |mode| {
            let mut net = lenet(mode)?;
            net.load_from(&mut RandomWeights {
                mode,
                rng: StdRng::seed_from_u64(42),
            })?;
            Ok(net)
        },
        &input,
        iterations,
    )?;
    print_report(&result);
    Ok(())
}
