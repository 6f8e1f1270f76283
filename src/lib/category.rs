//! Story categories and their process-group identities.
//!
//! Each paragraph in the input file opens with a header line naming one of the
//! four categories. A category maps 1:1 to a worker role in the fixed process
//! group: rank 0 is the coordinator and ranks 1 through 4 are the workers, in
//! the order listed by [`Category::ALL`].

use std::fmt;

/// Number of worker categories (and therefore worker roles).
pub const NUM_CATEGORIES: usize = 4;

/// A story genre, determining which worker processes a paragraph and which
/// line transform applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Horror,
    Comedy,
    Fantasy,
    ScienceFiction,
}

impl Category {
    /// All categories, in worker-rank order.
    pub const ALL: [Category; NUM_CATEGORIES] =
        [Category::Horror, Category::Comedy, Category::Fantasy, Category::ScienceFiction];

    /// The header label identifying this category in the input file.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Horror => "horror",
            Category::Comedy => "comedy",
            Category::Fantasy => "fantasy",
            Category::ScienceFiction => "science-fiction",
        }
    }

    /// Parse a paragraph header line into a category.
    ///
    /// Returns `None` for anything that is not exactly one of the four labels.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }

    /// The process-group rank of this category's worker (1-based; rank 0 is
    /// the coordinator).
    #[must_use]
    pub fn rank(self) -> usize {
        match self {
            Category::Horror => 1,
            Category::Comedy => 2,
            Category::Fantasy => 3,
            Category::ScienceFiction => 4,
        }
    }

    /// Map a worker rank back to its category.
    #[must_use]
    pub fn from_rank(rank: usize) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.rank() == rank)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(Category::from_label("romance"), None);
        assert_eq!(Category::from_label("Horror"), None);
        assert_eq!(Category::from_label(""), None);
    }

    #[test]
    fn test_rank_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_rank(category.rank()), Some(category));
        }
        // Rank 0 is the coordinator, not a worker.
        assert_eq!(Category::from_rank(0), None);
        assert_eq!(Category::from_rank(5), None);
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(Category::ScienceFiction.to_string(), "science-fiction");
    }
}
