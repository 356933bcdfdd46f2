// ABOUTME: Pluggable scoring interface behind the quick palette
// ABOUTME: Matchers build an index over entries and answer queries with ranked, span-annotated hits

use serde::Serialize;

use crate::item::QuickItem;

/// Field a match was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "field", content = "segment", rename_all = "camelCase")]
pub enum MatchField {
    Label,
    /// Path segment at the given index
    Path(usize),
}

/// Matched character ranges within one field, inclusive at both ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMatch {
    pub field: MatchField,
    pub spans: Vec<(usize, usize)>,
}

/// One ranked hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickMatch {
    /// Position of the entry in the indexed list
    pub index: usize,
    pub score: u32,
    pub matches: Vec<FieldMatch>,
}

impl QuickMatch {
    pub fn field(&self, field: MatchField) -> Option<&FieldMatch> {
        self.matches.iter().find(|m| m.field == field)
    }
}

/// Fuzzy scoring backend.
///
/// `query` returns hits ordered best first. Implementations must tolerate any
/// input string; an unmatchable query simply yields no hits.
pub trait FuzzyMatcher {
    type Index;

    fn index(&self, items: &[QuickItem]) -> Self::Index;

    fn query(&self, index: &Self::Index, text: &str) -> Vec<QuickMatch>;
}

/// Collapse sorted, possibly repeated char indices into inclusive ranges
pub fn merge_spans(indices: &[u32]) -> Vec<(usize, usize)> {
    let mut sorted: Vec<usize> = indices.iter().map(|i| *i as usize).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut spans: Vec<(usize, usize)> = Vec::new();
    for index in sorted {
        match spans.last_mut() {
            Some((_, end)) if *end + 1 == index => *end = index,
            _ => spans.push((index, index)),
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_spans() {
        assert_eq!(merge_spans(&[]), Vec::<(usize, usize)>::new());
        assert_eq!(merge_spans(&[4, 0, 1, 2, 4, 7]), vec![(0, 2), (4, 4), (7, 7)]);
    }
}
