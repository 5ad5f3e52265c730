use crate::core::stats::EnergySummary;

/// Self and cross energies of every handle admitted during a run.
///
/// Handle `i` of the comparison set owns row `i`, laid out as described in
/// [`super::validation`]: two self energies, then four cross energies for
/// each earlier handle `j < i`, at offsets `2 + 4j .. 2 + 4j + 4`. Handles
/// that were already accepted before the run began have no row of their
/// own; their interactions with later handles still appear in the later
/// rows. Admitting a handle appends one row, so the matrix is never
/// recomputed.
#[derive(Debug, Clone, Default)]
pub struct OffTargetMatrix {
    /// Number of leading handles without a row.
    preexisting: usize,
    rows: Vec<Vec<f64>>,
}

/// Worst and mean energy over every matrix entry that involves one handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleInteractions {
    pub worst: f64,
    pub mean: f64,
    pub count: usize,
}

impl OffTargetMatrix {
    pub fn new(preexisting: usize) -> Self {
        Self {
            preexisting,
            rows: Vec::new(),
        }
    }

    /// Total number of handles covered, with or without a row.
    pub fn handle_count(&self) -> usize {
        self.preexisting + self.rows.len()
    }

    pub fn preexisting(&self) -> usize {
        self.preexisting
    }

    pub fn expected_row_len(&self) -> usize {
        2 + 4 * self.handle_count()
    }

    /// Appends the row of the next admitted handle.
    ///
    /// Returns `false` and leaves the matrix untouched when the row does not
    /// cover exactly the handles admitted so far.
    pub fn push_row(&mut self, row: Vec<f64>) -> bool {
        if row.len() != self.expected_row_len() {
            return false;
        }
        self.rows.push(row);
        true
    }

    pub fn row(&self, handle: usize) -> Option<&[f64]> {
        handle
            .checked_sub(self.preexisting)
            .and_then(|idx| self.rows.get(idx))
            .map(Vec::as_slice)
    }

    /// Every recorded energy involving `handle`: its own row plus its column
    /// in the rows of later handles.
    pub fn interactions_of(&self, handle: usize) -> impl Iterator<Item = f64> + '_ {
        let own = self.row(handle).unwrap_or(&[]).iter().copied();
        let later_start = (handle + 1).max(self.preexisting) - self.preexisting;
        let column = self
            .rows
            .iter()
            .skip(later_start)
            .flat_map(move |row| row[2 + 4 * handle..2 + 4 * handle + 4].iter().copied());
        own.chain(column)
    }

    pub fn handle_interactions(&self, handle: usize) -> Option<HandleInteractions> {
        let summary = EnergySummary::from_values(self.interactions_of(handle))?;
        Some(HandleInteractions {
            worst: summary.min,
            mean: summary.mean,
            count: summary.count,
        })
    }

    pub fn self_energies(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flat_map(|row| row[..2].iter().copied())
    }

    pub fn cross_energies(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flat_map(|row| row[2..].iter().copied())
    }

    pub fn summary(&self) -> Option<EnergySummary> {
        EnergySummary::from_values(self.rows.iter().flatten().copied())
    }
}
