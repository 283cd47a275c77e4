//! Character-level alignment between the expected answer and the typed input.
//!
//! The opcode decomposition follows the classic longest-matching-block
//! recursion (Ratcliff/Obershelp, as popularised by difflib's
//! `SequenceMatcher`), so the same pair of strings always produces the same
//! alignment and ties resolve toward the leftmost match.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Character drawn on the shorter track where the other track has a character.
pub const PLACEHOLDER: char = '_';

/// Sequences at least this long get their most frequent characters ignored
/// when seeding matches.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Kind of edit an opcode describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// `a[a_start..a_end]` relates to `b[b_start..b_end]` as described by `tag`.
///
/// Indices are character positions, not byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opcode {
    pub tag: OpTag,
    pub a_start: usize,
    pub a_end: usize,
    pub b_start: usize,
    pub b_end: usize,
}

/// Tag attached to every cell of an alignment track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// Same character on both tracks.
    Match,
    /// A real character that differs from (or has no partner on) the other track.
    Mismatch,
    /// Placeholder standing in for a character this track lacks.
    Missing,
    /// A typed character with no counterpart in the expected answer.
    Extra,
}

/// One rendered character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub ch: char,
    pub tag: Tag,
}

impl Cell {
    fn new(ch: char, tag: Tag) -> Self {
        Self { ch, tag }
    }

    fn placeholder() -> Self {
        Self::new(PLACEHOLDER, Tag::Missing)
    }
}

/// Two parallel tracks of equal length, ready for side-by-side display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub expected: Vec<Cell>,
    pub input: Vec<Cell>,
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.expected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    /// Iterate over aligned (expected, input) pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&Cell, &Cell)> {
        self.expected.iter().zip(self.input.iter())
    }

    /// Number of pairs that are not a match.
    pub fn edit_count(&self) -> usize {
        self.pairs()
            .filter(|(e, i)| e.tag != Tag::Match || i.tag != Tag::Match)
            .count()
    }

    /// True when every pair matches.
    pub fn is_exact(&self) -> bool {
        self.edit_count() == 0
    }

    /// Expected track as text, placeholders included.
    pub fn expected_text(&self) -> String {
        self.expected.iter().map(|c| c.ch).collect()
    }

    /// Input track as text, placeholders included.
    pub fn input_text(&self) -> String {
        self.input.iter().map(|c| c.ch).collect()
    }
}

/// Align `expected` against `actual` character by character.
pub fn diff(expected: &str, actual: &str) -> Alignment {
    let a: Vec<char> = expected.chars().collect();
    let b: Vec<char> = actual.chars().collect();

    let mut alignment = Alignment::default();

    for op in Matcher::new(&a, &b).opcodes() {
        let a_run = &a[op.a_start..op.a_end];
        let b_run = &b[op.b_start..op.b_end];

        match op.tag {
            OpTag::Equal => {
                for (&x, &y) in a_run.iter().zip(b_run) {
                    alignment.expected.push(Cell::new(x, Tag::Match));
                    alignment.input.push(Cell::new(y, Tag::Match));
                }
            }
            OpTag::Replace => {
                for k in 0..a_run.len().max(b_run.len()) {
                    let (e, i) = match (a_run.get(k), b_run.get(k)) {
                        (Some(&x), Some(&y)) => {
                            (Cell::new(x, Tag::Mismatch), Cell::new(y, Tag::Mismatch))
                        }
                        (Some(&x), None) => (Cell::new(x, Tag::Mismatch), Cell::placeholder()),
                        (None, Some(&y)) => (Cell::placeholder(), Cell::new(y, Tag::Extra)),
                        (None, None) => unreachable!("k is below the longer run length"),
                    };
                    alignment.expected.push(e);
                    alignment.input.push(i);
                }
            }
            OpTag::Delete => {
                for &x in a_run {
                    alignment.expected.push(Cell::new(x, Tag::Mismatch));
                    alignment.input.push(Cell::placeholder());
                }
            }
            OpTag::Insert => {
                for &y in b_run {
                    alignment.expected.push(Cell::placeholder());
                    alignment.input.push(Cell::new(y, Tag::Extra));
                }
            }
        }
    }

    debug_assert_eq!(alignment.expected.len(), alignment.input.len());
    alignment
}

/// Opcodes turning `a` into `b`.
pub fn opcodes(a: &str, b: &str) -> Vec<Opcode> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    Matcher::new(&a, &b).opcodes()
}

/// Similarity in `[0, 1]`: twice the matched characters over the total length.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = Matcher::new(&a, &b)
        .matching_blocks()
        .iter()
        .map(|block| block.size)
        .sum();
    2.0 * matched as f64 / total as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Block {
    a: usize,
    b: usize,
    size: usize,
}

struct Matcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each character of `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> Matcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &ch) in b.iter().enumerate() {
            b2j.entry(ch).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Longest block with `a[alo..ahi]` and `b[blo..bhi]` in common.
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, then
    /// the one starting earliest in `b`.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] = length of the match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Grow over characters dropped by the autojunk heuristic.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        Block {
            a: best_i,
            b: best_j,
            size: best_size,
        }
    }

    /// Non-overlapping matching blocks in order, ending with a zero-size
    /// sentinel at `(a.len(), b.len())`.
    fn matching_blocks(&self) -> Vec<Block> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut pending = vec![(0, la, 0, lb)];
        let mut found = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            found.push(block);
            if alo < block.a && blo < block.b {
                pending.push((alo, block.a, blo, block.b));
            }
            if block.a + block.size < ahi && block.b + block.size < bhi {
                pending.push((block.a + block.size, ahi, block.b + block.size, bhi));
            }
        }
        found.sort();

        // Merge blocks that touch end to start.
        let mut blocks: Vec<Block> = Vec::with_capacity(found.len() + 1);
        for block in found {
            match blocks.last_mut() {
                Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                    last.size += block.size;
                }
                _ => blocks.push(block),
            }
        }
        blocks.push(Block {
            a: la,
            b: lb,
            size: 0,
        });
        blocks
    }

    fn opcodes(&self) -> Vec<Opcode> {
        let mut ops = Vec::new();
        let (mut i, mut j) = (0, 0);

        for block in self.matching_blocks() {
            let tag = match (i < block.a, j < block.b) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                ops.push(Opcode {
                    tag,
                    a_start: i,
                    a_end: block.a,
                    b_start: j,
                    b_end: block.b,
                });
            }

            i = block.a + block.size;
            j = block.b + block.size;
            if block.size > 0 {
                ops.push(Opcode {
                    tag: OpTag::Equal,
                    a_start: block.a,
                    a_end: i,
                    b_start: block.b,
                    b_end: j,
                });
            }
        }

        ops
    }
}
