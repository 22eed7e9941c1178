//! Line-based fold regions.
//!
//! A collapsed region keeps its first line visible and hides the remaining lines. The
//! [`ProjectionMapper`](crate::mapper::ProjectionMapper) turns the collapsed regions into hidden
//! character ranges.

/// Fold region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldRegion {
    /// Start line number
    pub start_line: usize,
    /// End line number (inclusive)
    pub end_line: usize,
    /// Whether folded
    pub is_collapsed: bool,
}

impl FoldRegion {
    /// Create an expanded folding region for an inclusive line range.
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
            is_collapsed: false,
        }
    }

    /// Create a collapsed folding region.
    pub fn collapsed(start_line: usize, end_line: usize) -> Self {
        Self {
            is_collapsed: true,
            ..Self::new(start_line, end_line)
        }
    }

    /// Check if line number is within fold region
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Whether `line` is hidden by this region.
    pub fn hides_line(&self, line: usize) -> bool {
        self.is_collapsed && line > self.start_line && line <= self.end_line
    }
}

/// Folding manager
#[derive(Debug, Default)]
pub struct FoldingManager {
    /// Sorted by start line; regions spanning fewer than two lines are dropped.
    regions: Vec<FoldRegion>,
}

impl FoldingManager {
    /// Create an empty folding manager.
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(&mut self) {
        self.regions.sort_by_key(|r| (r.start_line, r.end_line));
        self.regions
            .dedup_by(|a, b| a.start_line == b.start_line && a.end_line == b.end_line);
        self.regions.retain(|r| r.end_line > r.start_line);
    }

    /// Add a fold region.
    pub fn add_region(&mut self, region: FoldRegion) {
        self.regions.push(region);
        self.normalize();
    }

    /// All fold regions, sorted by start line.
    pub fn regions(&self) -> &[FoldRegion] {
        &self.regions
    }

    fn innermost_mut(&mut self, line: usize) -> Option<&mut FoldRegion> {
        self.regions
            .iter_mut()
            .filter(|r| r.contains_line(line))
            .min_by_key(|r| r.end_line - r.start_line)
    }

    /// Expand the innermost region containing `line`.
    pub fn expand_line(&mut self, line: usize) -> bool {
        match self.innermost_mut(line) {
            Some(region) => {
                region.is_collapsed = false;
                true
            }
            None => false,
        }
    }

    /// Expand all folds
    pub fn expand_all(&mut self) {
        for region in &mut self.regions {
            region.is_collapsed = false;
        }
    }

    /// Whether any collapsed region hides `line`.
    pub fn is_line_hidden(&self, line: usize) -> bool {
        self.regions.iter().any(|r| r.hides_line(line))
    }

    /// Inclusive line ranges hidden by collapsed regions, merged and sorted.
    pub fn hidden_line_ranges(&self) -> Vec<(usize, usize)> {
        let mut ranges: Vec<(usize, usize)> = self
            .regions
            .iter()
            .filter(|r| r.is_collapsed)
            .map(|r| (r.start_line + 1, r.end_line))
            .collect();
        ranges.sort_unstable();

        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
        for (start, end) in ranges {
            match merged.last_mut() {
                Some(last) if start <= last.1 + 1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }
        merged
    }

    /// Update fold regions to account for an edit that changes the number of logical lines.
    ///
    /// - `edit_line` is the logical line where the edit occurred (pre-edit).
    /// - `line_delta` is the net change in line count (`+n` for inserted lines, `-n` for deleted).
    pub fn apply_line_delta(&mut self, edit_line: usize, line_delta: isize) {
        if line_delta == 0 {
            return;
        }

        for region in &mut self.regions {
            if edit_line < region.start_line {
                let start = region.start_line as isize + line_delta;
                let end = region.end_line as isize + line_delta;
                region.start_line = start.max(0) as usize;
                region.end_line = end.max(0) as usize;
            } else if edit_line <= region.end_line {
                let end = region.end_line as isize + line_delta;
                region.end_line = end.max(region.start_line as isize) as usize;
            }
        }
        self.normalize();
    }

    /// Clamp fold regions to `line_count`, dropping regions that became empty.
    pub fn clamp_to_line_count(&mut self, line_count: usize) {
        let max_line = line_count.saturating_sub(1);
        for region in &mut self.regions {
            region.start_line = region.start_line.min(max_line);
            region.end_line = region.end_line.min(max_line);
        }
        self.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folding_manager() {
        let mut manager = FoldingManager::new();
        manager.add_region(FoldRegion::collapsed(5, 10));
        manager.add_region(FoldRegion::new(15, 20));

        assert!(manager.is_line_hidden(7));
        assert!(!manager.is_line_hidden(5));
        assert!(!manager.is_line_hidden(17));

        assert!(manager.expand_line(7));
        assert!(!manager.is_line_hidden(7));
        assert!(!manager.expand_line(12));
    }

    #[test]
    fn test_hidden_ranges_merge_nested() {
        let mut manager = FoldingManager::new();
        manager.add_region(FoldRegion::collapsed(2, 10));
        manager.add_region(FoldRegion::collapsed(4, 6));
        manager.add_region(FoldRegion::collapsed(11, 13));
        assert_eq!(manager.hidden_line_ranges(), vec![(3, 10), (12, 13)]);
    }

    #[test]
    fn test_apply_line_delta() {
        let mut manager = FoldingManager::new();
        manager.add_region(FoldRegion::new(5, 10));

        manager.apply_line_delta(2, -1);
        assert_eq!(manager.regions()[0], FoldRegion::new(4, 9));

        manager.apply_line_delta(6, 2);
        assert_eq!(manager.regions()[0], FoldRegion::new(4, 11));

        manager.apply_line_delta(5, -20);
        assert!(manager.regions().is_empty());
    }

    #[test]
    fn test_clamp_to_line_count() {
        let mut manager = FoldingManager::new();
        manager.add_region(FoldRegion::new(1, 8));
        manager.add_region(FoldRegion::new(6, 9));
        manager.clamp_to_line_count(5);
        assert_eq!(manager.regions(), &[FoldRegion::new(1, 4)]);
    }
}
