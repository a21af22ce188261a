//! Per-token match offsets for a search string across the whole document

/// Address of one match: page, token on that page, match within that token
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchPosition {
    /// Zero-based page index
    pub page: usize,
    /// Token index within the page
    pub item_id: usize,
    /// Match index within the token's offset list
    pub idx: usize,
}

/// Sparse `pages[page][token] -> offsets` structure plus a flat document-order
/// list of every match.
///
/// A token that was scanned without a hit has an empty offset list, so
/// `offsets(p, t)` is `Some` exactly for tokens that exist in the scanned
/// content.
#[derive(Clone, Debug, Default)]
pub struct MatchIndex {
    pages: Vec<Vec<Vec<usize>>>,
    flat: Vec<MatchPosition>,
}

impl MatchIndex {
    /// Scan every token of every page for `needle`.
    ///
    /// `needle` must already be lower-cased. Matches may overlap: after a hit
    /// at offset `m` scanning resumes at `m + 1`. Offsets are character
    /// offsets into the lower-cased token.
    #[must_use]
    pub fn build(page_contents: &[Vec<String>], needle: &str) -> Self {
        let mut index = Self::default();
        if needle.is_empty() {
            return index;
        }

        for (page, tokens) in page_contents.iter().enumerate() {
            let mut page_matches = Vec::with_capacity(tokens.len());
            for (item_id, token) in tokens.iter().enumerate() {
                let offsets = find_overlapping(&token.to_lowercase(), needle);
                index.flat.extend((0..offsets.len()).map(|idx| MatchPosition {
                    page,
                    item_id,
                    idx,
                }));
                page_matches.push(offsets);
            }
            index.pages.push(page_matches);
        }

        index
    }

    /// Total number of matches
    #[must_use]
    pub fn len(&self) -> usize {
        self.flat.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// Offsets recorded for a token, `None` if the token was never scanned
    #[must_use]
    pub fn offsets(&self, page: usize, item_id: usize) -> Option<&[usize]> {
        self.pages
            .get(page)
            .and_then(|tokens| tokens.get(item_id))
            .map(Vec::as_slice)
    }

    /// Match at a document-order rank (0-based)
    #[must_use]
    pub fn get(&self, rank: usize) -> Option<MatchPosition> {
        self.flat.get(rank).copied()
    }

    /// Document-order rank (0-based) of a match
    #[must_use]
    pub fn rank_of(&self, position: MatchPosition) -> Option<usize> {
        self.flat.binary_search(&position).ok()
    }

    /// Whether any token on the page has a match
    #[must_use]
    pub fn page_has_matches(&self, page: usize) -> bool {
        self.pages
            .get(page)
            .is_some_and(|tokens| tokens.iter().any(|offsets| !offsets.is_empty()))
    }

    /// Every match in document order
    pub fn iter(&self) -> impl Iterator<Item = MatchPosition> + '_ {
        self.flat.iter().copied()
    }

    /// Number of pages that were scanned
    #[must_use]
    pub fn pages_scanned(&self) -> usize {
        self.pages.len()
    }
}

fn find_overlapping(haystack: &str, needle: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut start = 0;

    while let Some(found) = haystack[start..].find(needle) {
        let byte_pos = start + found;
        offsets.push(haystack[..byte_pos].chars().count());

        // Resume one character past the match start
        let step = haystack[byte_pos..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        start = byte_pos + step;
    }

    offsets
}
