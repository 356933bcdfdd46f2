// ABOUTME: Fuzzy matcher backed by nucleo with prefix preference and match indices
// ABOUTME: Each whitespace-separated query token must hit the label or some path segment

use std::ops::DerefMut;

use nucleo::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo::{Config, Matcher, Utf32Str};
use parking_lot::Mutex;
use tracing::{instrument, trace};

use crate::item::QuickItem;
use crate::matcher::{FieldMatch, FuzzyMatcher, MatchField, QuickMatch, merge_spans};

/// Lazily initialized mutex, so the matcher's scratch memory is allocated once
pub struct LazyMutex<T> {
    inner: Mutex<Option<T>>,
    init: fn() -> T,
}

impl<T> LazyMutex<T> {
    pub const fn new(init: fn() -> T) -> Self {
        Self {
            inner: Mutex::new(None),
            init,
        }
    }

    pub fn lock(&self) -> impl DerefMut<Target = T> + '_ {
        parking_lot::MutexGuard::map(self.inner.lock(), |val| val.get_or_insert_with(self.init))
    }
}

/// Shared matcher instance
pub static MATCHER: LazyMutex<Matcher> = LazyMutex::new(Matcher::default);

/// Configuration for fuzzy matching behavior
#[derive(Debug, Clone)]
pub struct FuzzyConfig {
    pub prefer_prefix: bool,
    pub case_matching: CaseMatching,
    pub normalization: Normalization,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            prefer_prefix: true,
            case_matching: CaseMatching::Ignore,
            normalization: Normalization::Smart,
        }
    }
}

/// Searchable text of one indexed entry
#[derive(Debug, Clone)]
struct IndexedFields {
    label: String,
    path: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NucleoIndex {
    entries: Vec<IndexedFields>,
}

impl NucleoIndex {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NucleoMatcher {
    config: FuzzyConfig,
}

impl NucleoMatcher {
    pub fn new(config: FuzzyConfig) -> Self {
        Self { config }
    }

    pub fn with_prefer_prefix(prefer_prefix: bool) -> Self {
        Self::new(FuzzyConfig {
            prefer_prefix,
            ..FuzzyConfig::default()
        })
    }

    fn atoms(&self, text: &str) -> Vec<Atom> {
        text.split_whitespace()
            .map(|token| {
                Atom::new(
                    token,
                    self.config.case_matching,
                    self.config.normalization,
                    AtomKind::Fuzzy,
                    false,
                )
            })
            .collect()
    }
}

impl FuzzyMatcher for NucleoMatcher {
    type Index = NucleoIndex;

    fn index(&self, items: &[QuickItem]) -> NucleoIndex {
        NucleoIndex {
            entries: items
                .iter()
                .map(|item| IndexedFields {
                    label: item.label.clone(),
                    path: item.path.clone(),
                })
                .collect(),
        }
    }

    #[instrument(skip(self, index), fields(entries = index.len()))]
    fn query(&self, index: &NucleoIndex, text: &str) -> Vec<QuickMatch> {
        let atoms = self.atoms(text);
        if atoms.is_empty() {
            return Vec::new();
        }

        let mut matcher = MATCHER.lock();
        matcher.config = Config::DEFAULT;
        matcher.config.prefer_prefix = self.config.prefer_prefix;

        let mut buf = Vec::new();
        let mut indices = Vec::new();
        let mut hits = Vec::new();

        'entries: for (position, entry) in index.entries.iter().enumerate() {
            let fields = std::iter::once((MatchField::Label, entry.label.as_str())).chain(
                entry
                    .path
                    .iter()
                    .enumerate()
                    .map(|(i, segment)| (MatchField::Path(i), segment.as_str())),
            );
            let fields: Vec<_> = fields.collect();

            let mut total: u32 = 0;
            let mut field_indices: Vec<(MatchField, Vec<u32>)> = Vec::new();

            for atom in &atoms {
                let mut best: Option<u16> = None;
                for (field, value) in &fields {
                    indices.clear();
                    let haystack = Utf32Str::new(value, &mut buf);
                    let Some(score) = atom.indices(haystack, &mut matcher, &mut indices) else {
                        continue;
                    };
                    best = Some(best.map_or(score, |b| b.max(score)));
                    match field_indices.iter_mut().find(|(f, _)| f == field) {
                        Some((_, existing)) => existing.extend_from_slice(&indices),
                        None => field_indices.push((*field, indices.clone())),
                    }
                }
                match best {
                    Some(score) => total += u32::from(score),
                    None => continue 'entries,
                }
            }

            hits.push(QuickMatch {
                index: position,
                score: total,
                matches: field_indices
                    .into_iter()
                    .map(|(field, found)| FieldMatch {
                        field,
                        spans: merge_spans(&found),
                    })
                    .collect(),
            });
        }

        // Stable: equal scores keep index order
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        trace!(hits = hits.len(), "Quick search query finished");
        hits
    }
}
