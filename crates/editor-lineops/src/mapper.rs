//! Model/widget coordinate mapping.
//!
//! A viewer may show only part of its buffer. [`FlatMapper`] models a plain viewer restricted to
//! one contiguous visible region; [`ProjectionMapper`] models a folding viewer whose model
//! coverage is the whole buffer but whose collapsed folds hide ranges inside it.

use crate::document::TextBuffer;
use crate::folding::FoldingManager;
use crate::selection::Region;

/// Translates buffer ("model") offsets to offsets in the visible subset ("widget").
pub trait CoordinateMapper {
    /// The model range the viewer can address.
    fn visible_region(&self, buffer: &dyn TextBuffer) -> Region;

    /// Widget offset of a model offset, `None` when the offset is not visible.
    fn model_to_widget(&self, buffer: &dyn TextBuffer, offset: usize) -> Option<usize>;

    /// Whether the viewer addresses several model ranges through one widget (folding).
    fn is_projected(&self) -> bool {
        false
    }
}

/// A viewer without folding, optionally restricted to a visible region.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatMapper {
    region: Option<Region>,
}

impl FlatMapper {
    /// Mapper exposing the whole buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapper exposing only `region`.
    pub fn with_visible_region(region: Region) -> Self {
        Self {
            region: Some(region),
        }
    }
}

impl CoordinateMapper for FlatMapper {
    fn visible_region(&self, buffer: &dyn TextBuffer) -> Region {
        let len = buffer.len();
        match self.region {
            None => Region::new(0, len),
            Some(region) => {
                let start = region.offset.min(len);
                let end = region.end().min(len);
                Region::new(start, end - start)
            }
        }
    }

    fn model_to_widget(&self, buffer: &dyn TextBuffer, offset: usize) -> Option<usize> {
        let visible = self.visible_region(buffer);
        visible
            .contains_inclusive(offset)
            .then(|| offset - visible.offset)
    }
}

/// A folding viewer: everything is covered, collapsed fold bodies are hidden.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionMapper<'a> {
    folding: &'a FoldingManager,
}

impl<'a> ProjectionMapper<'a> {
    /// Mapper hiding the collapsed regions of `folding`.
    pub fn new(folding: &'a FoldingManager) -> Self {
        Self { folding }
    }

    /// Hidden model ranges as half-open `(start, end)` character offsets.
    pub fn hidden_ranges(&self, buffer: &dyn TextBuffer) -> Vec<(usize, usize)> {
        let last_line = buffer.number_of_lines().saturating_sub(1);
        let mut ranges = Vec::new();
        for (start_line, end_line) in self.folding.hidden_line_ranges() {
            if start_line > last_line {
                continue;
            }
            let end_line = end_line.min(last_line);
            let (Ok(start), Ok(end_start), Ok(end_len)) = (
                buffer.line_offset(start_line),
                buffer.line_offset(end_line),
                buffer.line_length(end_line),
            ) else {
                continue;
            };
            ranges.push((start, end_start + end_len));
        }
        ranges
    }
}

impl CoordinateMapper for ProjectionMapper<'_> {
    fn visible_region(&self, buffer: &dyn TextBuffer) -> Region {
        Region::new(0, buffer.len())
    }

    fn model_to_widget(&self, buffer: &dyn TextBuffer, offset: usize) -> Option<usize> {
        if offset > buffer.len() {
            return None;
        }
        let mut hidden_before = 0;
        for (start, end) in self.hidden_ranges(buffer) {
            if offset >= start && offset < end {
                return None;
            }
            if end <= offset {
                hidden_before += end - start;
            }
        }
        Some(offset - hidden_before)
    }

    fn is_projected(&self) -> bool {
        true
    }
}
