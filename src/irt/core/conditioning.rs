//! Response conditioning — compact representations for the likelihood
//! kernels.
//!
//! Purpose
//! -------
//! Reduce validated response matrices to the representation each model
//! family actually consumes:
//! - dichotomous models work on deduplicated response *patterns* (unique
//!   participant columns with multiplicities), stored as a signed-kernel
//!   matrix so one logistic formula covers both outcomes via sign flip;
//! - polytomous models work on per-item densely recoded categories with an
//!   explicit per-item category count (a ragged structure — items may use
//!   different numbers of categories).
//!
//! Key behaviors
//! -------------
//! - [`ResponsePatterns::from_data`] deduplicates columns in lexicographic
//!   order and converts each binary entry to a signed exponent (+1
//!   endorsed, −1 otherwise).
//! - [`ConditionedPolytomous::from_data`] recodes each item's observed
//!   category values to consecutive codes `0..m_i`, preserving the missing
//!   sentinel, and tallies per-category counts.
//! - [`EndorsementTally::from_data`] counts endorsements per item (the
//!   descriptive statistic behind the separable difficulty solve).
//!
//! Invariants & assumptions
//! ------------------------
//! - Input containers are already validated; no entry checks happen here.
//! - Pattern multiplicities sum to the participant count.
//! - Recoded categories for item `i` lie in `0..m_i` with `m_i ≥ 2`, or
//!   equal [`MISSING_RESPONSE`].
use crate::irt::core::data::{DichotomousData, PolytomousData, MISSING_RESPONSE};
use ndarray::{Array1, Array2, ArrayView1};
use std::collections::BTreeMap;

/// Deduplicated dichotomous response patterns in signed-kernel form.
///
/// Column `p` of `signs` holds one unique participant response pattern:
/// `+1.0` where the pattern endorses an item, `−1.0` where it does not.
/// `counts[p]` is the number of participants sharing that pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsePatterns {
    signs: Array2<f64>,
    counts: Array1<f64>,
    n_participants: usize,
}

impl ResponsePatterns {
    /// Deduplicate participant columns and convert to signed exponents.
    ///
    /// Patterns are ordered lexicographically by their 0/1 encoding, which
    /// makes the pattern order (and therefore the numerics) deterministic.
    pub fn from_data(data: &DichotomousData) -> Self {
        let n_items = data.n_items();
        let n_participants = data.n_participants();

        let mut multiplicities: BTreeMap<Vec<u8>, usize> = BTreeMap::new();
        for participant in 0..n_participants {
            let column: Vec<u8> =
                (0..n_items).map(|item| data.responses()[[item, participant]]).collect();
            *multiplicities.entry(column).or_insert(0) += 1;
        }

        let n_patterns = multiplicities.len();
        let mut signs = Array2::<f64>::zeros((n_items, n_patterns));
        let mut counts = Array1::<f64>::zeros(n_patterns);
        for (pattern, (column, multiplicity)) in multiplicities.iter().enumerate() {
            counts[pattern] = *multiplicity as f64;
            for item in 0..n_items {
                signs[[item, pattern]] = if column[item] == 1 { 1.0 } else { -1.0 };
            }
        }
        ResponsePatterns { signs, counts, n_participants }
    }

    /// Number of unique patterns.
    pub fn n_patterns(&self) -> usize {
        self.counts.len()
    }

    /// Number of items.
    pub fn n_items(&self) -> usize {
        self.signs.nrows()
    }

    /// Participants represented by the multiplicities.
    pub fn n_participants(&self) -> usize {
        self.n_participants
    }

    /// Pattern multiplicities; sums to the participant count.
    pub fn counts(&self) -> &Array1<f64> {
        &self.counts
    }

    /// Signed exponents for one item across all patterns.
    pub fn item_signs(&self, item: usize) -> ArrayView1<'_, f64> {
        self.signs.row(item)
    }
}

/// Per-item endorsement tallies for a dichotomous matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct EndorsementTally {
    endorsed: Vec<usize>,
    n_participants: usize,
}

impl EndorsementTally {
    /// Count endorsements per item.
    pub fn from_data(data: &DichotomousData) -> Self {
        let endorsed = (0..data.n_items())
            .map(|item| data.item(item).iter().filter(|&&r| r == 1).count())
            .collect();
        EndorsementTally { endorsed, n_participants: data.n_participants() }
    }

    /// Observed endorsement proportion for an item, strictly inside
    /// (0, 1) for validated data.
    pub fn proportion(&self, item: usize) -> f64 {
        self.endorsed[item] as f64 / self.n_participants as f64
    }
}

/// One item's conditioned polytomous responses.
///
/// `categories[participant]` is the dense code in `0..n_categories`, or
/// [`MISSING_RESPONSE`] where the item was not administered.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionedItem {
    categories: Array1<i32>,
    counts: Array1<f64>,
    n_categories: usize,
}

impl ConditionedItem {
    /// Number of observed categories for this item (`m_i ≥ 2`).
    pub fn n_categories(&self) -> usize {
        self.n_categories
    }

    /// Dense category codes per participant.
    pub fn categories(&self) -> &Array1<i32> {
        &self.categories
    }

    /// Observed count per dense category; every entry is ≥ 1.
    pub fn counts(&self) -> &Array1<f64> {
        &self.counts
    }

    /// Non-missing response count.
    pub fn n_observed(&self) -> f64 {
        self.counts.sum()
    }
}

/// Ragged, per-item conditioned polytomous responses.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionedPolytomous {
    items: Vec<ConditionedItem>,
    n_participants: usize,
}

impl ConditionedPolytomous {
    /// Recode each item's observed category values to consecutive codes.
    ///
    /// Observed values are ranked per item; unused codes between them are
    /// dropped rather than carried as empty categories, so each item's
    /// dense codes cover exactly `0..m_i`.
    pub fn from_data(data: &PolytomousData) -> Self {
        let n_participants = data.n_participants();
        let items = (0..data.n_items())
            .map(|item| {
                let row = data.item(item);
                let mut observed: Vec<i32> =
                    row.iter().copied().filter(|&c| c != MISSING_RESPONSE).collect();
                observed.sort_unstable();
                observed.dedup();

                let n_categories = observed.len();
                let mut counts = Array1::<f64>::zeros(n_categories);
                let categories = Array1::from_iter(row.iter().map(|&code| {
                    if code == MISSING_RESPONSE {
                        MISSING_RESPONSE
                    } else {
                        // Validated input: the code is always present.
                        let dense = observed.binary_search(&code).unwrap_or(0);
                        counts[dense] += 1.0;
                        dense as i32
                    }
                }));
                ConditionedItem { categories, counts, n_categories }
            })
            .collect();
        ConditionedPolytomous { items, n_participants }
    }

    /// Number of items.
    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    /// Number of participants (columns of the source matrix).
    pub fn n_participants(&self) -> usize {
        self.n_participants
    }

    /// One conditioned item.
    pub fn item(&self, item: usize) -> &ConditionedItem {
        &self.items[item]
    }

    /// Largest per-item category count.
    pub fn max_categories(&self) -> usize {
        self.items.iter().map(|item| item.n_categories).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The multiplicity invariant (counts sum to participants).
    // - The signed-kernel convention.
    // - Dense recoding with gapped codes, missing entries, and ragged
    //   category counts.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that duplicate columns collapse and multiplicities sum to the
    // participant count.
    //
    // Given
    // -----
    // - Five participants producing three unique columns.
    //
    // Expect
    // ------
    // - Three patterns, counts summing to 5.
    fn pattern_multiplicities_sum_to_participants() {
        let data = DichotomousData::new(array![
            [1, 0, 1, 1, 0],
            [0, 1, 0, 0, 1],
            [1, 1, 1, 0, 1],
        ])
        .unwrap();

        let patterns = ResponsePatterns::from_data(&data);

        assert_eq!(patterns.n_patterns(), 3);
        assert_eq!(patterns.counts().sum(), 5.0);
        assert_eq!(patterns.n_participants(), 5);
    }

    #[test]
    // Purpose
    // -------
    // Verify the sign convention: +1 for an endorsement, −1 otherwise.
    fn signs_follow_endorsement() {
        let data = DichotomousData::new(array![[1, 0], [0, 1]]).unwrap();
        let patterns = ResponsePatterns::from_data(&data);

        // Lexicographic order puts column (0, 1) first.
        assert_eq!(patterns.item_signs(0).to_vec(), vec![-1.0, 1.0]);
        assert_eq!(patterns.item_signs(1).to_vec(), vec![1.0, -1.0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify endorsement proportions.
    fn tally_proportions() {
        let data = DichotomousData::new(array![[1, 0, 1, 1], [0, 1, 0, 0]]).unwrap();
        let tally = EndorsementTally::from_data(&data);
        assert_eq!(tally.proportion(0), 0.75);
        assert_eq!(tally.proportion(1), 0.25);
    }

    #[test]
    // Purpose
    // -------
    // Verify dense recoding with gapped codes, preserved missing entries,
    // and ragged category counts across items.
    fn recoding_is_dense_ragged_and_missing_aware() {
        let data = PolytomousData::new(array![
            [2, 5, 9, 2, MISSING_RESPONSE],
            [0, 1, 0, 1, 0],
        ])
        .unwrap();

        let conditioned = ConditionedPolytomous::from_data(&data);

        let first = conditioned.item(0);
        assert_eq!(first.n_categories(), 3);
        assert_eq!(first.categories().to_vec(), vec![0, 1, 2, 0, MISSING_RESPONSE]);
        assert_eq!(first.counts().to_vec(), vec![2.0, 1.0, 1.0]);
        assert_eq!(first.n_observed(), 4.0);

        let second = conditioned.item(1);
        assert_eq!(second.n_categories(), 2);
        assert_eq!(second.counts().to_vec(), vec![3.0, 2.0]);

        assert_eq!(conditioned.max_categories(), 3);
    }
}
