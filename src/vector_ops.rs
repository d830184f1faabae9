use crate::config::{Number, EPSILON};
use wide::f32x8;

/// Sparse TF-IDF vector. Only non-zero weights are stored, sorted by
/// feature index, but `dim` is always the full vocabulary size.
#[derive(Debug, Clone, PartialEq)]
pub struct TermVector {
    dim: usize,
    entries: Vec<(u32, Number)>,
}

impl TermVector {
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Builds a vector from `(feature, weight)` pairs. Pairs must be sorted by
    /// feature and within `dim`; zero weights are dropped.
    pub fn from_sorted(dim: usize, entries: Vec<(u32, Number)>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        debug_assert!(entries.iter().all(|&(i, _)| (i as usize) < dim));
        let entries = entries.into_iter().filter(|&(_, w)| w != 0.0).collect();
        Self { dim, entries }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(u32, Number)] {
        &self.entries
    }

    pub fn get(&self, feature: usize) -> Number {
        self.entries
            .binary_search_by_key(&(feature as u32), |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn norm(&self) -> Number {
        self.entries.iter().map(|&(_, w)| w * w).sum::<Number>().sqrt()
    }

    pub fn normalize(&mut self) {
        let magnitude = self.norm();
        if magnitude > EPSILON {
            for (_, w) in self.entries.iter_mut() {
                *w /= magnitude;
            }
        }
    }

    pub fn dot(&self, other: &TermVector) -> Number {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (fa, wa) = self.entries[i];
            let (fb, wb) = other.entries[j];
            match fa.cmp(&fb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn to_dense(&self) -> Vec<Number> {
        let mut dense = vec![0.0; self.dim];
        for &(i, w) in &self.entries {
            dense[i as usize] = w;
        }
        dense
    }
}

/// Cosine similarity between two non-negative term vectors, in `[0, 1]`.
/// A zero vector on either side scores 0.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> Number {
    let denominator = a.norm() * b.norm();
    if denominator < EPSILON {
        return 0.0;
    }
    (a.dot(b) / denominator).clamp(0.0, 1.0)
}

fn lane(v: &[Number]) -> f32x8 {
    f32x8::new([v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7]])
}

/// Squared Euclidean distance between two dense vectors of equal length.
pub fn squared_euclidean_simd(a: &[Number], b: &[Number]) -> Number {
    debug_assert_eq!(a.len(), b.len());
    let len = a.len().min(b.len());
    let simd_len = len - (len % 8);

    let mut acc = f32x8::splat(0.0);
    for i in (0..simd_len).step_by(8) {
        let diff = lane(&a[i..i + 8]) - lane(&b[i..i + 8]);
        acc += diff * diff;
    }

    let mut sum = acc.reduce_add();
    for i in simd_len..len {
        let diff = a[i] - b[i];
        sum += diff * diff;
    }
    sum
}
