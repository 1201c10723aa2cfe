use std::time::{Duration, Instant};

use tracing::info;

use crate::error::{Error, Result};
use crate::network::{LayerType, Network};
use crate::quantization::QuantMode;
use crate::tensor::Tensor;

/// Timing and memory of one network stage in one mode.
pub struct LayerMetrics {
    pub layer_idx: usize,
    pub layer_type: LayerType,
    pub time: Duration,
    pub mem: usize,
}

/// Results of one quantization mode.
pub struct ModeMetrics {
    pub mode: QuantMode,
    pub layers: Vec<LayerMetrics>,
    /// Mean wall time of a full `predict`.
    pub mean_time: Duration,
    pub total_mem: usize,
    /// Index of the largest output, the predicted class.
    pub prediction: usize,
}

/// Aggregate results over every mode, FP first when present.
pub struct BenchmarkResult {
    pub modes: Vec<ModeMetrics>,
    pub iterations: usize,
}

impl BenchmarkResult {
    pub fn get(&self, mode: QuantMode) -> Option<&ModeMetrics> {
        self.modes.iter().find(|m| m.mode == mode)
    }

    /// FP mean time divided by `mode`'s mean time.
    pub fn speedup(&self, mode: QuantMode) -> Option<f64> {
        let fp = self.get(QuantMode::Fp)?.mean_time.as_secs_f64();
        let other = self.get(mode)?.mean_time.as_secs_f64();
        (other > 0.0).then(|| fp / other)
    }

    /// Fraction of FP weight memory saved by `mode`, in percent.
    pub fn memory_savings(&self, mode: QuantMode) -> Option<f64> {
        let fp = self.get(QuantMode::Fp)?.total_mem;
        let other = self.get(mode)?.total_mem;
        (fp > 0).then(|| (1.0 - other as f64 / fp as f64) * 100.0)
    }
}

pub fn argmax(tensor: &Tensor) -> usize {
    let mut max_val = f32::NEG_INFINITY;
    let mut max_idx = 0;
    for (i, &val) in tensor.as_slice().iter().enumerate() {
        if val > max_val {
            max_val = val;
            max_idx = i;
        }
    }
    max_idx
}

/// Build one network per mode with `builder` and time `iterations` predictions
/// of `input` on each.
pub fn run_benchmark<F>(builder: F, input: &Tensor, iterations: usize) -> Result<BenchmarkResult>
where
    F: Fn(QuantMode) -> Result<Network>,
{
    if iterations == 0 {
        return Err(Error::InvalidConfig("benchmark needs at least one iteration".into()));
    }
    let mut modes = Vec::with_capacity(QuantMode::ALL.len());
    for mode in QuantMode::ALL {
        let net = builder(mode)?;
        let layer_mem = net.layer_weight_memory();

        let (output, layer_times) = net.predict_timed(input.clone())?;
        let layers = layer_times
            .into_iter()
            .zip(layer_mem)
            .enumerate()
            .map(|(layer_idx, ((layer_type, time), mem))| LayerMetrics {
                layer_idx,
                layer_type,
                time,
                mem,
            })
            .collect::<Vec<_>>();

        let mut total = Duration::ZERO;
        for _ in 0..iterations {
            let start = Instant::now();
            net.predict(input.clone())?;
            total += start.elapsed();
        }
        let mean_time = total / iterations as u32;
        let total_mem = net.weight_memory_bytes();
        info!(%mode, ?mean_time, total_mem, "benchmarked");

        modes.push(ModeMetrics {
            mode,
            layers,
            mean_time,
            total_mem,
            prediction: argmax(&output),
        });
    }
    Ok(BenchmarkResult { modes, iterations })
}

/// Print a formatted benchmark report to stdout.
pub fn print_report(result: &BenchmarkResult) {
    println!("\n=== Per-Layer Metrics ===");
    println!("{:<6} {:<10} {:<5} {:>10} {:>12}", "Layer", "Type", "Mode", "Time", "Weights");
    for m in &result.modes {
        for l in &m.layers {
            let ms = l.time.as_micros() as f64 / 1000.0;
            println!("{:<6} {:<10} {:<5} {:>8.3}ms {:>11}B", l.layer_idx, l.layer_type, m.mode, ms, l.mem);
        }
    }

    println!("\n=== Totals ({} iterations) ===", result.iterations);
    for m in &result.modes {
        let ms = m.mean_time.as_micros() as f64 / 1000.0;
        match (result.speedup(m.mode), result.memory_savings(m.mode)) {
            (Some(speedup), Some(savings)) if m.mode.is_quantized() => println!(
                "{:<4}: {:.3}ms / {}B    Speedup: {:.2}x  Savings: {:.0}%  Class: {}",
                m.mode, ms, m.total_mem, speedup, savings, m.prediction
            ),
            _ => println!("{:<4}: {:.3}ms / {}B    Class: {}", m.mode, ms, m.total_mem, m.prediction),
        }
    }
}
