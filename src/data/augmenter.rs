// ============================================================
// Layer 4 — Label Augmenter
// ============================================================
// Synthesises negative examples by moving each one-hot "1"
// to a nearby wrong column:
//
//   orig   = argmax(row)
//   offset ~ uniform{-2, -1, 1, 2}     (independent per row)
//   new    = (orig + offset) mod num_classes
//
// The input is left untouched; a corrupted copy is returned.
//
// With 3 or more classes every offset is non-zero modulo the
// class count, so `new != orig` always holds. With 2 classes
// an offset of ±2 lands back on the original column, and with
// a single class every row maps onto itself.
//
// The random source is passed in, so a seeded StdRng makes the
// corruption reproducible.

use ndarray::Array2;
use rand::{seq::SliceRandom, Rng};

use crate::domain::labels::argmax;

/// Shift offsets drawn for each row.
pub const OFFSETS: [isize; 4] = [-2, -1, 1, 2];

/// Return a copy of `labels` with each row's set bit moved by a random offset.
pub fn augment_labels<R: Rng + ?Sized>(labels: &Array2<f32>, rng: &mut R) -> Array2<f32> {
    let num_classes = labels.ncols();
    let mut corrupted = labels.clone();
    if num_classes == 0 {
        return corrupted;
    }
    if num_classes <= 2 {
        tracing::warn!(
            "Only {} label classes: corrupted labels may coincide with true labels",
            num_classes
        );
    }

    for mut row in corrupted.rows_mut() {
        let orig   = argmax(row.view());
        let offset = *OFFSETS.choose(rng).unwrap_or(&1);
        let new    = shift(orig, offset, num_classes);
        row[orig] = 0.0;
        row[new]  = 1.0;
    }
    corrupted
}

/// `(orig + offset) mod num_classes`, always non-negative.
fn shift(orig: usize, offset: isize, num_classes: usize) -> usize {
    (orig as isize + offset).rem_euclid(num_classes as isize) as usize
}
