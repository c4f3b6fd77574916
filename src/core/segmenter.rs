// File: src/core/segmenter.rs
use crate::core::lexicon::Lexicon;
use crate::core::types::{Candidate, Segment};
use crate::error::{Error, Result};

/// Minimal cumulative costs for every prefix of one input, together with the
/// width chosen to reach each prefix. Index `i` describes the first `i` code points.
#[derive(Debug, Clone, PartialEq)]
pub struct CostTable {
    costs: Vec<f64>,
    widths: Vec<usize>,
}

impl CostTable {
    /// Cost of the prefix of length `i`. `cost(0)` is always `0.0`.
    pub fn cost(&self, i: usize) -> Option<f64> {
        self.costs.get(i).copied()
    }

    /// Width of the last chunk of the best split of the first `i` code points.
    pub fn width(&self, i: usize) -> Option<usize> {
        self.widths.get(i).copied().filter(|&w| w > 0)
    }

    /// Number of code points covered.
    pub fn len(&self) -> usize {
        self.costs.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_cost(&self) -> f64 {
        self.costs[self.costs.len() - 1]
    }
}

/// Splits concatenated words into the cheapest sequence of lexicon chunks.
///
/// The search is a shortest path over prefix lengths where each edge is a chunk
/// of at most `max_word_len` code points, priced by [`Lexicon::word_cost`].
pub struct Segmenter<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> Segmenter<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Returns the partition of `input` in left-to-right order.
    pub fn segment(&self, input: &str) -> Result<Vec<Segment>> {
        if input.is_empty() {
            return Ok(vec![]);
        }
        if self.lexicon.contains(input) {
            return Ok(vec![Segment::new(input, input.chars().count())]);
        }

        let offsets = char_offsets(input);
        let table = self.fill_table(input, &offsets)?;
        let segments = self.backtrace(input, &offsets, &table)?;
        tracing::debug!(input, segments = segments.len(), cost = table.total_cost(), "segmented");
        Ok(segments)
    }

    /// Runs only the forward pass over `input`.
    pub fn cost_table(&self, input: &str) -> Result<CostTable> {
        self.fill_table(input, &char_offsets(input))
    }

    /// Widest chunk the search considers. Never below one so that every position
    /// has a candidate even when the lexicon is empty.
    fn window(&self) -> usize {
        self.lexicon.max_word_len().max(1)
    }

    fn fill_table(&self, input: &str, offsets: &[usize]) -> Result<CostTable> {
        let n = offsets.len() - 1;
        let mut costs = Vec::with_capacity(n + 1);
        let mut widths = Vec::with_capacity(n + 1);
        costs.push(0.0);
        widths.push(0);

        for i in 1..=n {
            let best = self
                .best_candidate(input, offsets, &costs, i)
                .ok_or(Error::SegmentationInvariant { position: i, len: n })?;
            costs.push(best.cost);
            widths.push(best.width);
        }

        Ok(CostTable { costs, widths })
    }

    /// Cheapest chunk ending at code point `i`, given costs for every shorter prefix.
    /// Widths are tried from 1 upward and only a strictly lower cost replaces the
    /// current best, so ties go to the shortest chunk.
    fn best_candidate(
        &self,
        input: &str,
        offsets: &[usize],
        costs: &[f64],
        i: usize,
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for k in 1..=i.min(self.window()) {
            let word = &input[offsets[i - k]..offsets[i]];
            let cost = costs[i - k] + self.lexicon.chunk_cost(word, k);
            if best.map_or(true, |b| cost < b.cost) {
                best = Some(Candidate { cost, width: k });
            }
        }
        best
    }

    fn backtrace(&self, input: &str, offsets: &[usize], table: &CostTable) -> Result<Vec<Segment>> {
        let n = table.len();
        let mut out = Vec::new();
        let mut i = n;
        while i > 0 {
            let k = table
                .width(i)
                .filter(|&k| k <= i)
                .ok_or(Error::SegmentationInvariant { position: i, len: n })?;
            out.push(Segment::new(&input[offsets[i - k]..offsets[i]], k));
            i -= k;
        }
        out.reverse();
        Ok(out)
    }
}

/// Byte offset of every code point boundary, including both ends.
fn char_offsets(input: &str) -> Vec<usize> {
    input
        .char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(input.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{LexiconEntry, UNKNOWN_CHAR_COST};

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn lexicon(rows: &[(&str, &str)]) -> Lexicon {
        rows.iter().map(|(w, t)| LexiconEntry::new(w, t)).collect()
    }

    #[test]
    fn test_splits_concatenated_words() {
        let lexicon = lexicon(&[("cat", "K AE T"), ("dog", "D AO G")]);
        let segments = Segmenter::new(&lexicon).segment("catdog").unwrap();
        assert_eq!(texts(&segments), ["cat", "dog"]);
        assert_eq!(segments.iter().map(|s| s.width).collect::<Vec<_>>(), [3, 3]);
    }

    #[test]
    fn test_whole_word_fast_path() {
        let lexicon = lexicon(&[("cat", "K AE T"), ("c", "C"), ("at", "AT")]);
        let segments = Segmenter::new(&lexicon).segment("cat").unwrap();
        assert_eq!(segments, [Segment::new("cat", 3)]);
    }

    #[test]
    fn test_empty_input() {
        let lexicon = lexicon(&[("cat", "K AE T")]);
        assert!(Segmenter::new(&lexicon).segment("").unwrap().is_empty());
    }

    #[test]
    fn test_ties_prefer_shortest_final_chunk() {
        // ab + cd and abc + d both cost 2.0; the final chunk "d" is shorter.
        let lexicon: Lexicon = [
            LexiconEntry::new("ab", "AB").with_cost(1.0),
            LexiconEntry::new("abc", "ABC").with_cost(1.0),
            LexiconEntry::new("cd", "CD").with_cost(1.0),
            LexiconEntry::new("d", "D").with_cost(1.0),
        ]
        .into_iter()
        .collect();
        let segmenter = Segmenter::new(&lexicon);
        let segments = segmenter.segment("abcd").unwrap();
        assert_eq!(texts(&segments), ["abc", "d"]);
        assert_eq!(segmenter.cost_table("abcd").unwrap().total_cost(), 2.0);
    }

    #[test]
    fn test_longer_words_win_under_unigram_costs() {
        // "ab" + "cd" costs 1.0, "abc" + "d" costs 1/3 + 1.
        let lexicon = lexicon(&[("ab", "AB"), ("abc", "ABC"), ("cd", "CD"), ("d", "D")]);
        let segments = Segmenter::new(&lexicon).segment("abcd").unwrap();
        assert_eq!(texts(&segments), ["ab", "cd"]);
    }

    #[test]
    fn test_cost_table_recurrence() {
        let lexicon = lexicon(&[("the", "DH AH"), ("re", "R EH"), ("there", "DH EH R"), ("is", "IH Z")]);
        let segmenter = Segmenter::new(&lexicon);
        let input = "thereisx";
        let table = segmenter.cost_table(input).unwrap();
        let chars: Vec<char> = input.chars().collect();

        assert_eq!(table.len(), chars.len());
        assert_eq!(table.cost(0), Some(0.0));
        for i in 1..=chars.len() {
            let expected = (1..=i.min(lexicon.max_word_len()))
                .map(|k| {
                    let word: String = chars[i - k..i].iter().collect();
                    table.cost(i - k).unwrap() + lexicon.word_cost(&word)
                })
                .fold(f64::INFINITY, f64::min);
            assert_eq!(table.cost(i), Some(expected), "prefix {i}");
        }
    }

    #[test]
    fn test_unknown_run_is_priced_per_code_point() {
        let lexicon = lexicon(&[("hello", "HH AH L OW")]);
        let segmenter = Segmenter::new(&lexicon);
        // Every split of an unknown run costs the same, so ties give single code points.
        let segments = segmenter.segment("xyz").unwrap();
        assert_eq!(texts(&segments), ["x", "y", "z"]);
        assert_eq!(segmenter.cost_table("xyz").unwrap().total_cost(), 3.0 * UNKNOWN_CHAR_COST);
    }

    #[test]
    fn test_unknown_prefix_leaves_tail_split_unchanged() {
        let lexicon = lexicon(&[("ab", "AB"), ("abc", "ABC"), ("cd", "CD"), ("d", "D")]);
        let segmenter = Segmenter::new(&lexicon);
        let plain = segmenter.segment("abcd").unwrap();
        let prefixed = segmenter.segment("xabcd").unwrap();
        assert_eq!(texts(&prefixed), ["x", "ab", "cd"]);
        assert_eq!(prefixed[1..], plain[..]);

        let table = segmenter.cost_table("xabcd").unwrap();
        assert_eq!(table.total_cost(), UNKNOWN_CHAR_COST + 1.0);
    }

    #[test]
    fn test_known_costs_survive_after_unknown_chunk() {
        // Without the leading "q", "thereis" splits as "there" + "is".
        let lexicon = lexicon(&[("the", "DH AH"), ("re", "R EH"), ("there", "DH EH R"), ("is", "IH Z")]);
        let segments = Segmenter::new(&lexicon).segment("qthereis").unwrap();
        assert_eq!(texts(&segments), ["q", "there", "is"]);
    }

    #[test]
    fn test_known_split_beats_unknown() {
        let lexicon = lexicon(&[("a", "A"), ("b", "B"), ("abx", "ABX")]);
        let segments = Segmenter::new(&lexicon).segment("ab").unwrap();
        assert_eq!(texts(&segments), ["a", "b"]);
    }

    #[test]
    fn test_whitespace_is_removed_but_counted() {
        let lexicon = lexicon(&[("cat", "K AE T"), ("dog", "D AO G")]);
        let segments = Segmenter::new(&lexicon).segment("cat dog").unwrap();
        let total: usize = segments.iter().map(|s| s.width).sum();
        assert_eq!(total, 7);
        assert!(segments.iter().all(|s| !s.text.contains(' ')));
        assert!(texts(&segments).contains(&"cat"));
    }

    #[test]
    fn test_empty_lexicon_degrades_to_single_chars() {
        let lexicon = Lexicon::default();
        let segments = Segmenter::new(&lexicon).segment("abc").unwrap();
        assert_eq!(texts(&segments), ["a", "b", "c"]);
    }

    #[test]
    fn test_widths_cover_multibyte_input() {
        let lexicon = lexicon(&[("สวัสดี", "sà-wàt-dii"), ("ครับ", "kráp")]);
        let input = "สวัสดีครับ";
        let segments = Segmenter::new(&lexicon).segment(input).unwrap();
        assert_eq!(texts(&segments), ["สวัสดี", "ครับ"]);
        let total: usize = segments.iter().map(|s| s.width).sum();
        assert_eq!(total, input.chars().count());
    }
}
