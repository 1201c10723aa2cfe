#![allow(dead_code)]

/// Compare two output slices with a given tolerance.
pub fn assert_approx_eq(a: &[f32], b: &[f32], tol: f32, label: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch {} vs {}", label, a.len(), b.len());
    for (i, (va, vb)) in a.iter().zip(b.iter()).enumerate() {
        assert!(
            (va - vb).abs() < tol,
            "{}: mismatch at index {}: {} vs {} (diff={})",
            label, i, va, vb, (va - vb).abs()
        );
    }
}

/// Deterministic ±1 values.
pub fn signs(len: usize, seed: usize) -> Vec<f32> {
    (0..len)
        .map(|i| if (i * 7 + seed * 13 + i / 3) % 5 < 2 { -1.0 } else { 1.0 })
        .collect()
}

/// Deterministic -1/0/+1 values.
pub fn trits(len: usize, seed: usize) -> Vec<f32> {
    (0..len).map(|i| ((i * 5 + seed * 11 + i / 4) % 3) as f32 - 1.0).collect()
}
