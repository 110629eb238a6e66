//! The segmentation algorithm.

use regex::Regex;
use storyreel_core::Segment;
use storyreel_error::{SegmentError, SegmentErrorKind, StoryreelResult};
use tracing::{debug, info};

/// Conservative speaking-rate estimate (150 words per minute).
pub const WORDS_PER_SECOND: f64 = 2.5;

/// Splits script text into an exact number of timed segments.
///
/// # Examples
///
/// ```
/// use storyreel_segment::Segmenter;
///
/// let segmenter = Segmenter::new(2, 8.0).unwrap();
/// let segments = segmenter.segment("One. Two. Three. Four.");
/// assert_eq!(segments.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Segmenter {
    target_segments: usize,
    target_duration: f64,
    whitespace: Regex,
    brackets: Regex,
    parens: Regex,
    sentence_punct: Regex,
    clause_punct: Regex,
}

impl Segmenter {
    /// Create a segmenter for the given target count and per-segment
    /// duration.
    ///
    /// # Errors
    ///
    /// Returns a [`SegmentError`] if either target is non-positive. Invalid
    /// configuration is rejected here, before any text is processed.
    pub fn new(target_segments: i32, target_duration: f64) -> StoryreelResult<Self> {
        if target_segments <= 0 {
            Err(SegmentError::new(SegmentErrorKind::TargetCount(
                target_segments,
            )))?;
        }
        if target_duration <= 0.0 {
            Err(SegmentError::new(SegmentErrorKind::TargetDuration(
                target_duration,
            )))?;
        }
        Ok(Self {
            target_segments: target_segments as usize,
            target_duration,
            whitespace: Regex::new(r"\s+").expect("valid whitespace regex"),
            brackets: Regex::new(r"\[[^\]]*\]").expect("valid bracket regex"),
            parens: Regex::new(r"\([^)]*\)").expect("valid paren regex"),
            sentence_punct: Regex::new(r"\s*([.!?])\s*").expect("valid sentence punct regex"),
            clause_punct: Regex::new(r"\s*([,;:])\s*").expect("valid clause punct regex"),
        })
    }

    /// Target number of segments.
    pub fn target_segments(&self) -> usize {
        self.target_segments
    }

    /// Target per-segment duration in seconds.
    pub fn target_duration(&self) -> f64 {
        self.target_duration
    }

    /// Collapse whitespace, strip bracketed stage directions, and normalize
    /// punctuation spacing.
    pub fn clean_text(&self, text: &str) -> String {
        let text = self.whitespace.replace_all(text.trim(), " ");
        let text = self.brackets.replace_all(&text, "");
        let text = self.parens.replace_all(&text, "");
        let text = self.sentence_punct.replace_all(&text, "$1 ");
        let text = self.clause_punct.replace_all(&text, "$1 ");
        self.whitespace
            .replace_all(text.trim(), " ")
            .trim()
            .to_string()
    }

    /// Split cleaned text on sentence-ending punctuation boundaries.
    ///
    /// A boundary is a `.`, `!`, or `?` followed by whitespace or the end of
    /// input; runs like `?!` split after the final mark.
    fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        for (pos, &(byte, c)) in chars.iter().enumerate() {
            if matches!(c, '.' | '!' | '?') {
                let next = chars.get(pos + 1).map(|&(_, n)| n);
                if next.map_or(true, |n| n.is_whitespace()) {
                    let end = byte + c.len_utf8();
                    let sentence = text[start..end].trim();
                    if !sentence.is_empty() {
                        sentences.push(sentence);
                    }
                    start = end;
                }
            }
        }
        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail);
        }
        sentences
    }

    /// Estimated speaking duration for a piece of text.
    fn estimate_duration(text: &str) -> f64 {
        text.split_whitespace().count() as f64 / WORDS_PER_SECOND
    }

    /// Build a segment from text alone, deriving duration and word count.
    fn timed_segment(index: usize, text: String, start_time: f64) -> Segment {
        let word_count = text.split_whitespace().count();
        let duration = word_count as f64 / WORDS_PER_SECOND;
        Segment::new(
            index,
            text,
            duration,
            word_count,
            start_time,
            start_time + duration,
        )
    }

    /// Greedy grouping of sentences into segments of roughly the target
    /// duration. Never splits inside a sentence, so the resulting count is
    /// data-dependent.
    fn initial_segments(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut current_duration = 0.0;
        let mut start_time = 0.0;

        for sentence in self.split_sentences(text) {
            let sentence_duration = Self::estimate_duration(sentence);
            if !current.is_empty() && current_duration + sentence_duration > self.target_duration
            {
                let segment =
                    Self::timed_segment(segments.len() + 1, current.clone(), start_time);
                start_time = *segment.end_time();
                segments.push(segment);
                current.clear();
                current.push_str(sentence);
                current_duration = sentence_duration;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(sentence);
                current_duration += sentence_duration;
            }
        }

        if !current.is_empty() {
            segments.push(Self::timed_segment(segments.len() + 1, current, start_time));
        }

        segments
    }

    /// Reindex 1..N and recompute contiguous, strictly increasing
    /// timestamps from the cumulative durations.
    fn reindex(segments: Vec<Segment>) -> Vec<Segment> {
        let mut out = Vec::with_capacity(segments.len());
        let mut cursor = 0.0;
        for (i, segment) in segments.into_iter().enumerate() {
            let duration = *segment.duration();
            out.push(Segment::new(
                i + 1,
                segment.text().clone(),
                duration,
                *segment.word_count(),
                cursor,
                cursor + duration,
            ));
            cursor += duration;
        }
        out
    }

    /// Index of the longest-duration segment that still has at least two
    /// words. One-word segments cannot split without producing empty text.
    fn longest_splittable(segments: &[Segment]) -> Option<usize> {
        segments
            .iter()
            .enumerate()
            .filter(|(_, s)| *s.word_count() >= 2)
            .max_by(|(_, a), (_, b)| a.duration().total_cmp(b.duration()))
            .map(|(i, _)| i)
    }

    /// Index of the adjacent pair with the smallest combined duration.
    fn cheapest_adjacent_pair(segments: &[Segment]) -> usize {
        let mut best_index = 0;
        let mut best_duration = f64::INFINITY;
        for i in 0..segments.len() - 1 {
            let combined = segments[i].duration() + segments[i + 1].duration();
            if combined < best_duration {
                best_duration = combined;
                best_index = i;
            }
        }
        best_index
    }

    /// Adjust a segment list to exactly the target count.
    ///
    /// An already-correct-length list is returned unchanged. Too few
    /// segments: repeatedly split the longest at its word-count midpoint.
    /// Too many: repeatedly merge the cheapest adjacent pair.
    fn reconcile(&self, segments: Vec<Segment>) -> Vec<Segment> {
        if segments.is_empty() || segments.len() == self.target_segments {
            return segments;
        }
        let mut segments = segments;

        while segments.len() < self.target_segments {
            let Some(index) = Self::longest_splittable(&segments) else {
                debug!(
                    count = segments.len(),
                    target = self.target_segments,
                    "no splittable segment remains"
                );
                break;
            };
            let words: Vec<&str> = segments[index].text().split_whitespace().collect();
            let mid = words.len() / 2;
            let start = *segments[index].start_time();
            let first = Self::timed_segment(index + 1, words[..mid].join(" "), start);
            let second_start = *first.end_time();
            let second = Self::timed_segment(index + 2, words[mid..].join(" "), second_start);
            segments.splice(index..=index, [first, second]);
            segments = Self::reindex(segments);
        }

        while segments.len() > self.target_segments && segments.len() > 1 {
            let index = Self::cheapest_adjacent_pair(&segments);
            let merged_text = format!(
                "{} {}",
                segments[index].text(),
                segments[index + 1].text()
            );
            let start = *segments[index].start_time();
            let merged = Self::timed_segment(index + 1, merged_text, start);
            segments.splice(index..=index + 1, [merged]);
            segments = Self::reindex(segments);
        }

        segments
    }

    /// Segment script text into exactly the target number of segments.
    ///
    /// Empty input (after cleaning) yields an empty result.
    #[tracing::instrument(skip_all, fields(target = self.target_segments))]
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        let cleaned = self.clean_text(text);
        if cleaned.is_empty() {
            debug!("input is empty after cleaning");
            return Vec::new();
        }
        let word_count = cleaned.split_whitespace().count();
        debug!(chars = cleaned.len(), words = word_count, "cleaned script");

        let initial = self.initial_segments(&cleaned);
        debug!(count = initial.len(), "initial segments");

        let segments = self.reconcile(initial);
        let total_duration: f64 = segments.iter().map(|s| s.duration()).sum();
        info!(
            count = segments.len(),
            total_duration = format_args!("{total_duration:.1}"),
            "segmentation complete"
        );
        segments
    }

    /// Non-fatal diagnostics for a segmentation result.
    ///
    /// An empty vec means the result is clean.
    pub fn validate(&self, segments: &[Segment]) -> Vec<String> {
        if segments.is_empty() {
            return vec!["no segments provided".to_string()];
        }
        let mut issues = Vec::new();

        if segments.len() != self.target_segments {
            issues.push(format!(
                "expected {} segments, got {}",
                self.target_segments,
                segments.len()
            ));
        }

        let empty: Vec<usize> = segments
            .iter()
            .filter(|s| s.text().trim().is_empty())
            .map(|s| *s.index())
            .collect();
        if !empty.is_empty() {
            issues.push(format!("empty segments found: {empty:?}"));
        }

        let max = segments
            .iter()
            .map(|s| *s.duration())
            .fold(f64::NEG_INFINITY, f64::max);
        let min = segments
            .iter()
            .map(|s| *s.duration())
            .fold(f64::INFINITY, f64::min);
        if max > self.target_duration * 1.5 {
            issues.push(format!("some segments too long (max: {max:.1}s)"));
        }
        if min < self.target_duration * 0.3 {
            issues.push(format!("some segments too short (min: {min:.1}s)"));
        }

        issues
    }
}

/// Segment a script in one call.
///
/// # Errors
///
/// Returns a [`SegmentError`] for non-positive targets.
pub fn segment_script(
    text: &str,
    target_segments: i32,
    target_duration: f64,
) -> StoryreelResult<Vec<Segment>> {
    let segmenter = Segmenter::new(target_segments, target_duration)?;
    Ok(segmenter.segment(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words_of(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    fn assert_contiguous(segments: &[Segment]) {
        let mut cursor = 0.0;
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(*segment.index(), i + 1);
            assert!((segment.start_time() - cursor).abs() < 1e-9);
            assert!(segment.end_time() > segment.start_time());
            cursor = *segment.end_time();
        }
    }

    #[test]
    fn rejects_non_positive_targets() {
        assert!(Segmenter::new(0, 8.0).is_err());
        assert!(Segmenter::new(-1, 8.0).is_err());
        assert!(Segmenter::new(5, 0.0).is_err());
        assert!(Segmenter::new(5, -2.0).is_err());
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let segmenter = Segmenter::new(3, 8.0).unwrap();
        assert!(segmenter.segment("").is_empty());
        assert!(segmenter.segment("   \n\t  ").is_empty());
    }

    #[test]
    fn clean_text_strips_stage_directions() {
        let segmenter = Segmenter::new(3, 8.0).unwrap();
        let cleaned = segmenter.clean_text("A hero [dramatic pause] enters (stage left) now.");
        assert_eq!(cleaned, "A hero enters now.");
    }

    #[test]
    fn clean_text_normalizes_punctuation_spacing() {
        let segmenter = Segmenter::new(3, 8.0).unwrap();
        let cleaned = segmenter.clean_text("First .Second ,  third !");
        assert_eq!(cleaned, "First. Second, third!");
    }

    #[test]
    fn splits_on_sentence_boundaries() {
        let segmenter = Segmenter::new(3, 8.0).unwrap();
        let sentences = segmenter.split_sentences("One. Two! Three? Done");
        assert_eq!(sentences, vec!["One.", "Two!", "Three?", "Done"]);
    }

    #[test]
    fn multi_mark_runs_split_after_the_last_mark() {
        let segmenter = Segmenter::new(3, 8.0).unwrap();
        let sentences = segmenter.split_sentences("Really?! Yes.");
        assert_eq!(sentences, vec!["Really?!", "Yes."]);
    }

    #[test]
    fn four_sentences_into_two_segments() {
        let segmenter = Segmenter::new(2, 8.0).unwrap();
        let segments = segmenter.segment("One. Two. Three. Four.");
        assert_eq!(segments.len(), 2);
        let combined: Vec<String> = segments
            .iter()
            .flat_map(|s| s.text().split_whitespace().map(str::to_string))
            .collect();
        assert_eq!(combined, vec!["One.", "Two.", "Three.", "Four."]);
        assert_contiguous(&segments);
    }

    #[test]
    fn produces_exact_target_count() {
        let text = "The sun rises over the valley. Birds wake in the tall pines. \
                    A river cuts through the stones below. Mist clings to the ridge. \
                    Far away a bell rings. The village stirs slowly. Smoke curls from \
                    the first chimney. A dog barks twice and is quiet.";
        for target in 1..=8 {
            let segmenter = Segmenter::new(target, 4.0).unwrap();
            let segments = segmenter.segment(text);
            assert_eq!(segments.len(), target as usize, "target {target}");
            assert_contiguous(&segments);
        }
    }

    #[test]
    fn round_trip_preserves_every_word() {
        let segmenter = Segmenter::new(5, 3.0).unwrap();
        let text = "Dawn breaks cold and clear. The expedition packs camp quickly. \
                    Ahead the glacier glitters like broken glass. Nobody speaks.";
        let cleaned = segmenter.clean_text(text);
        let segments = segmenter.segment(text);
        let rejoined: Vec<String> = segments
            .iter()
            .flat_map(|s| s.text().split_whitespace().map(str::to_string))
            .collect();
        assert_eq!(rejoined, words_of(&cleaned));
    }

    #[test]
    fn single_long_sentence_is_split_in_reconciliation() {
        // One sentence, no internal boundaries: the greedy phase keeps it
        // whole and reconciliation halves it until the count matches.
        let segmenter = Segmenter::new(4, 2.0).unwrap();
        let text = "the long caravan wound slowly across the endless dunes toward \
                    the shimmering line of the horizon without any pause at all";
        let segments = segmenter.segment(text);
        assert_eq!(segments.len(), 4);
        assert_contiguous(&segments);
        let rejoined: Vec<String> = segments
            .iter()
            .flat_map(|s| s.text().split_whitespace().map(str::to_string))
            .collect();
        assert_eq!(rejoined, words_of(&segmenter.clean_text(text)));
    }

    #[test]
    fn merges_down_to_target_count() {
        // Short sentences with a tight duration produce many greedy segments.
        let segmenter = Segmenter::new(2, 0.5).unwrap();
        let segments = segmenter.segment("One. Two. Three. Four. Five. Six.");
        assert_eq!(segments.len(), 2);
        assert_contiguous(&segments);
    }

    #[test]
    fn reconcile_is_idempotent_on_correct_length() {
        let segmenter = Segmenter::new(3, 4.0).unwrap();
        let segments = segmenter.segment(
            "First sentence here. Second sentence follows. Third one closes it.",
        );
        assert_eq!(segments.len(), 3);
        let reconciled = segmenter.reconcile(segments.clone());
        assert_eq!(reconciled, segments);
    }

    #[test]
    fn one_word_segments_are_never_split() {
        let segmenter = Segmenter::new(3, 8.0).unwrap();
        let segments = segmenter.segment("Go.");
        // Cannot reach three segments from a single word; validate reports it.
        assert_eq!(segments.len(), 1);
        assert!(segments.iter().all(|s| !s.text().trim().is_empty()));
        let issues = segmenter.validate(&segments);
        assert!(issues.iter().any(|i| i.contains("expected 3 segments")));
    }

    #[test]
    fn validate_flags_duration_outliers() {
        let segmenter = Segmenter::new(2, 8.0).unwrap();
        let segments = vec![
            Segment::new(1, "a ".repeat(40).trim().to_string(), 16.0, 40, 0.0, 16.0),
            Segment::new(2, "b".to_string(), 0.4, 1, 16.0, 16.4),
        ];
        let issues = segmenter.validate(&segments);
        assert!(issues.iter().any(|i| i.contains("too long")));
        assert!(issues.iter().any(|i| i.contains("too short")));
    }

    #[test]
    fn validate_reports_empty_input() {
        let segmenter = Segmenter::new(2, 8.0).unwrap();
        assert_eq!(
            segmenter.validate(&[]),
            vec!["no segments provided".to_string()]
        );
    }

    #[test]
    fn convenience_function_propagates_config_errors() {
        assert!(segment_script("text", -1, 8.0).is_err());
        let segments = segment_script("One. Two.", 2, 8.0).unwrap();
        assert_eq!(segments.len(), 2);
    }
}
