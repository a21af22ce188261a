//! Search selection state: the committed cursor, navigation direction and the
//! data handed to the text-layer renderer

use crate::match_index::{MatchIndex, MatchPosition};

/// Committed selection.
///
/// `position == None` with `number == 0` is the null selection.
/// `number` is the 1-based ordinal of the selected match in document order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionCursor {
    pub position: Option<MatchPosition>,
    pub number: usize,
}

impl SelectionCursor {
    #[must_use]
    pub const fn null() -> Self {
        Self {
            position: None,
            number: 0,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.position.is_none()
    }

    /// Rank of the next match in `direction`, or `None` at the boundary.
    ///
    /// This is the working cursor: it is only committed by the caller when it
    /// addresses an existing match.
    #[must_use]
    pub fn step(&self, index: &MatchIndex, direction: Direction) -> Option<usize> {
        let current = self.position.and_then(|pos| index.rank_of(pos));
        let candidate = match (direction, current) {
            (Direction::Forward, None) => 0,
            (Direction::Forward, Some(rank)) => rank + 1,
            (Direction::Backward, None) => return None,
            (Direction::Backward, Some(rank)) => rank.checked_sub(1)?,
        };
        (candidate < index.len()).then_some(candidate)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Ordinal change applied when a step in this direction commits
    #[must_use]
    pub fn ordinal_diff(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// What a find / find-next / find-prev call did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    /// No active search, boundary reached, or nothing found
    Unchanged,
    /// The search string was emptied and highlights dropped
    Cleared,
    /// A new match was committed
    Selected {
        position: MatchPosition,
        number: usize,
        /// The match page was outside the render window and got focused
        focused: bool,
    },
}

impl NavOutcome {
    /// 1-based page the viewer was moved to, if any
    #[must_use]
    pub fn focused_page(&self) -> Option<usize> {
        match self {
            NavOutcome::Selected {
                position,
                focused: true,
                ..
            } => Some(position.page + 1),
            _ => None,
        }
    }
}

/// Everything the text-layer renderer needs to splice highlights into one
/// token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchData<'a> {
    pub search_text: &'a str,
    /// Character offsets of every match in the token
    pub matches: &'a [usize],
    pub selected: SelectionCursor,
    /// Which entry of `matches` is the committed selection, if any
    pub selected_idx: Option<usize>,
}

impl MatchData<'_> {
    /// Character ranges to highlight, paired with whether each is selected
    pub fn highlight_ranges(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        let len = self.search_text.chars().count();
        self.matches
            .iter()
            .enumerate()
            .map(move |(idx, &start)| (start, start + len, Some(idx) == self.selected_idx))
    }

    /// Render `token` with matches wrapped in `[..]` and the selected match
    /// in `[[..]]`.
    ///
    /// Overlapping matches merge into one mark; the selected match always
    /// wins over a plain one.
    #[must_use]
    pub fn mark(&self, token: &str) -> String {
        let chars: Vec<char> = token.chars().collect();
        let mut levels = vec![Mark::None; chars.len()];
        for (start, end, selected) in self.highlight_ranges() {
            let mark = if selected { Mark::Selected } else { Mark::Match };
            for level in levels.iter_mut().take(end).skip(start) {
                *level = (*level).max(mark);
            }
        }

        let mut out = String::with_capacity(token.len() + 4);
        let mut current = Mark::None;
        for (ch, &level) in chars.iter().zip(&levels) {
            if level != current {
                out.push_str(current.close());
                out.push_str(level.open());
                current = level;
            }
            out.push(*ch);
        }
        out.push_str(current.close());
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Mark {
    None,
    Match,
    Selected,
}

impl Mark {
    fn open(self) -> &'static str {
        match self {
            Mark::None => "",
            Mark::Match => "[",
            Mark::Selected => "[[",
        }
    }

    fn close(self) -> &'static str {
        match self {
            Mark::None => "",
            Mark::Match => "]",
            Mark::Selected => "]]",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> MatchIndex {
        let pages = vec![
            vec!["ab ab".to_string()],
            vec!["none".to_string()],
            vec!["x".to_string(), "ab".to_string()],
        ];
        MatchIndex::build(&pages, "ab")
    }

    #[test]
    fn forward_from_null_lands_on_first_match() {
        let index = index();
        assert_eq!(SelectionCursor::null().step(&index, Direction::Forward), Some(0));
    }

    #[test]
    fn backward_from_null_is_a_boundary() {
        let index = index();
        assert_eq!(SelectionCursor::null().step(&index, Direction::Backward), None);
    }

    #[test]
    fn steps_stop_at_both_ends() {
        let index = index();
        let last = SelectionCursor {
            position: index.get(2),
            number: 3,
        };
        assert_eq!(last.step(&index, Direction::Forward), None);
        assert_eq!(last.step(&index, Direction::Backward), Some(1));

        let first = SelectionCursor {
            position: index.get(0),
            number: 1,
        };
        assert_eq!(first.step(&index, Direction::Backward), None);
    }

    #[test]
    fn highlight_ranges_mark_selection() {
        let data = MatchData {
            search_text: "ab",
            matches: &[0, 3],
            selected: SelectionCursor::null(),
            selected_idx: Some(1),
        };
        assert_eq!(
            data.highlight_ranges().collect::<Vec<_>>(),
            vec![(0, 2, false), (3, 5, true)]
        );
    }

    #[test]
    fn mark_wraps_matches_and_selection() {
        let data = MatchData {
            search_text: "ab",
            matches: &[0, 3],
            selected: SelectionCursor::null(),
            selected_idx: Some(1),
        };
        assert_eq!(data.mark("Ab ab!"), "[Ab] [[ab]]!");
    }

    #[test]
    fn mark_keeps_selected_overlapping_match() {
        let mut data = MatchData {
            search_text: "aa",
            matches: &[0, 1, 2],
            selected: SelectionCursor::null(),
            selected_idx: Some(1),
        };
        assert_eq!(data.mark("aaaa"), "[a][[aa]][a]");

        data.selected_idx = Some(2);
        assert_eq!(data.mark("aaaa"), "[aa][[aa]]");

        data.selected_idx = None;
        assert_eq!(data.mark("aaaa"), "[aaaa]");
    }

    #[test]
    fn focused_page_is_one_based() {
        let outcome = NavOutcome::Selected {
            position: MatchPosition {
                page: 4,
                item_id: 0,
                idx: 0,
            },
            number: 1,
            focused: true,
        };
        assert_eq!(outcome.focused_page(), Some(5));
        assert_eq!(NavOutcome::Unchanged.focused_page(), None);
    }
}
