//! Reachability of a configuration from the solved board.

use crate::permutation::count_inversions;

/// Decides whether the row-major `values` of a `size`×`size` board can be
/// reached from the solved board by sliding the blank (value `size * size`).
///
/// Inversions are counted over the non-blank tiles only. Odd widths need an
/// even count. Even widths also depend on the blank's row counted from the
/// bottom starting at 1: the count's parity must differ from that distance's.
///
/// Input that is not exactly `size * size` values is never solvable.
pub fn is_solvable(values: &[u32], size: usize) -> bool {
    let Some(cells) = size.checked_mul(size) else {
        return false;
    };
    if size == 0 || values.len() != cells {
        return false;
    }
    let blank = cells as u32;
    let tiles: Vec<u32> = values.iter().copied().filter(|&v| v != blank).collect();
    let inversions = count_inversions(&tiles);

    if size % 2 == 1 {
        return inversions % 2 == 0;
    }

    let Some(blank_index) = values.iter().position(|&v| v == blank) else {
        return false;
    };
    let row_from_bottom = size - blank_index / size;

    // odd inversions need an even distance, even inversions an odd one
    (inversions % 2 == 1) == (row_from_bottom % 2 == 0)
}
