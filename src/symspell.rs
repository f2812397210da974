// SymSpell: Symmetric Delete spelling correction
//
// The Symmetric Delete algorithm reduces the complexity of edit candidate
// generation and dictionary lookup for a given Damerau-Levenshtein distance.
// Opposite to other approaches only deletes are required, no transposes +
// replaces + inserts. Transposes + replaces + inserts of the input term are
// transformed into deletes of the dictionary term. Replaces and inserts are
// expensive and language dependent: e.g. Chinese has 70,000 Unicode Han
// characters!
//
// Based on SymSpell by Wolf Garbe, https://github.com/wolfgarbe/symspell
// MIT License

use std::cmp::{max, min};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::{Arc, LazyLock};

use ahash::{AHashMap, AHashSet, RandomState};
use derive_builder::Builder;
use regex::Regex;
use tracing::warn;

use crate::composition::Composition;
use crate::distance::EditDistance;
use crate::error::{Error, Result};
use crate::helpers::{
    self, case_transfer_similar, corpus_tokens, is_acronym, len, normalize_nfkc, parse_words,
    remove, slice,
};
use crate::persistence::{SymSpellState, DATA_VERSION};
use crate::suggestion::{Suggestion, Verbosity};

// Fixed seeds keep the variant hash stable across processes, so rebuilt and
// reloaded indexes agree bucket for bucket.
pub(crate) static HASHER_64: LazyLock<RandomState> =
    LazyLock::new(|| RandomState::with_seeds(808259318, 750368348, 84901999, 789810389));

#[inline]
pub(crate) fn hash64(term_bytes: &[u8]) -> u64 {
    HASHER_64.hash_one(term_bytes)
}

fn matches_at_start(pattern: &Regex, input: &str) -> bool {
    pattern.find(input).is_some_and(|m| m.start() == 0)
}

// Estimated count of an unknown word, C = 10 / 10^word_length, from the
// occurrence probability P = 10 / (N * 10^word_length) proposed by Peter
// Norvig in Natural Language Corpus Data, page 224
// http://norvig.com/ngrams/ch14.pdf
fn unknown_word_count(term_len: usize) -> u64 {
    (10.0 / 10f64.powi(term_len as i32)) as u64
}

/// SymSpell spell checker and corrector.
///
/// Construct with [`SymSpell::new`] or through [`SymSpellBuilder`]:
///
/// ```
/// use symcorrect::{DistanceAlgorithm, EditDistance, SymSpellBuilder};
///
/// let engine = SymSpellBuilder::default()
///     .max_dictionary_edit_distance(1)
///     .prefix_length(5)
///     .distance_comparer(EditDistance::new(DistanceAlgorithm::LevenshteinFast, None).unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(0, engine.word_count());
/// ```
#[derive(Builder)]
#[builder(
    pattern = "owned",
    build_fn(validate = "SymSpellBuilder::validate", error = "Error")
)]
pub struct SymSpell {
    /// Maximum edit distance for dictionary precalculation.
    #[builder(default = "2")]
    max_dictionary_edit_distance: i64,
    /// The length of word prefixes from which deletes are generated (5..7).
    #[builder(default = "7")]
    prefix_length: i64,
    /// The minimum frequency count for dictionary words to be considered
    /// valid for spelling correction.
    #[builder(default = "1")]
    count_threshold: u64,
    // Number of all words in the corpus used to generate the frequency
    // dictionary. Used to calculate the word occurrence probability p from
    // word counts c: p = c/N. N equals the sum of all counts c in the
    // dictionary only if the dictionary is complete, but not if it is
    // truncated or filtered.
    #[builder(default = "1_024_908_267_229")]
    corpus_word_count: u64,
    /// Edit distance capability used to verify candidates.
    #[builder(default)]
    distance_comparer: EditDistance,
    // Length of the longest word in the dictionary. Kept as an upper bound:
    // deleting the longest word leaves it stale.
    #[builder(default = "0", setter(skip))]
    max_length: i64,
    // Maps the hash of every delete variant to the dictionary words it was
    // derived from. Hash collisions are tolerated because candidates are
    // ultimately verified through the distance comparer.
    #[builder(default, setter(skip))]
    deletes: AHashMap<u64, Vec<Arc<str>>>,
    // Correctly spelled words with their frequency counts.
    #[builder(default, setter(skip))]
    words: AHashMap<Arc<str>, u64>,
    // Words whose accumulated count has not yet reached count_threshold.
    #[builder(default, setter(skip))]
    below_threshold_words: AHashMap<Arc<str>, u64>,
    // Bigrams optionally used for improved correction quality in
    // lookup_compound.
    #[builder(default, setter(skip))]
    bigrams: AHashMap<Box<str>, u64>,
    // Minimum count over all loaded bigrams, the smoothing floor for unseen
    // pairs.
    #[builder(default = "u64::MAX", setter(skip))]
    bigram_count_min: u64,
}

impl SymSpellBuilder {
    fn validate(&self) -> Result<()> {
        let max_edit_distance = self.max_dictionary_edit_distance.unwrap_or(2);
        let prefix_length = self.prefix_length.unwrap_or(7);
        if max_edit_distance < 0 {
            return Err(Error::InvalidConfig(
                "max_dictionary_edit_distance cannot be negative".to_string(),
            ));
        }
        if prefix_length < 1 {
            return Err(Error::InvalidConfig(
                "prefix_length cannot be less than 1".to_string(),
            ));
        }
        if prefix_length < max_edit_distance {
            return Err(Error::InvalidConfig(
                "prefix_length cannot be smaller than max_dictionary_edit_distance".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SymSpell {
    fn default() -> Self {
        SymSpellBuilder::default()
            .build()
            .expect("default configuration is valid")
    }
}

impl SymSpell {
    /// Creates a new SymSpell instance with the given precalculation edit
    /// distance, prefix length and count threshold.
    pub fn new(
        max_dictionary_edit_distance: i64,
        prefix_length: i64,
        count_threshold: u64,
    ) -> Result<Self> {
        SymSpellBuilder::default()
            .max_dictionary_edit_distance(max_dictionary_edit_distance)
            .prefix_length(prefix_length)
            .count_threshold(count_threshold)
            .build()
    }

    /// Number of correctly spelled words in the dictionary.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Number of delete variants in the index.
    pub fn entry_count(&self) -> usize {
        self.deletes.len()
    }

    /// Length of the longest indexed word. An upper bound after deletions.
    pub fn max_length(&self) -> i64 {
        self.max_length
    }

    /// Frequency count of a correctly spelled word.
    pub fn word_frequency(&self, term: &str) -> Option<u64> {
        self.words.get(term).copied()
    }

    pub fn below_threshold_word_count(&self) -> usize {
        self.below_threshold_words.len()
    }

    pub fn below_threshold_frequency(&self, term: &str) -> Option<u64> {
        self.below_threshold_words.get(term).copied()
    }

    pub fn bigram_count(&self) -> usize {
        self.bigrams.len()
    }

    pub fn bigram_frequency(&self, key: &str) -> Option<u64> {
        self.bigrams.get(key).copied()
    }

    /// Create or update an entry in the dictionary.
    ///
    /// For every new word, deletes with an edit distance of
    /// 1..max_dictionary_edit_distance are derived from its prefix and added
    /// to the index, each pointing back at the original term. The dictionary
    /// may be updated dynamically at any time.
    ///
    /// Returns true if the word was added as a new correctly spelled word,
    /// false if it was held below threshold or only had its count updated.
    pub fn create_dictionary_entry(&mut self, key: &str, count: u64) -> bool {
        // a zero count cannot promote anything and is never stored
        if count == 0 {
            return false;
        }
        let mut count = count;

        // below threshold words can only exist for thresholds above one
        if self.count_threshold > 1 {
            if let Some(&count_previous) = self.below_threshold_words.get(key) {
                count = count_previous.saturating_add(count);
                if count >= self.count_threshold {
                    // reached the threshold: promoted to a correct word below
                    self.below_threshold_words.remove(key);
                } else {
                    self.below_threshold_words.insert(Arc::from(key), count);
                    return false;
                }
            }
        }
        if let Some(&count_previous) = self.words.get(key) {
            // just update the count of an already added word
            self.words
                .insert(Arc::from(key), count_previous.saturating_add(count));
            return false;
        }
        if count < self.count_threshold {
            self.below_threshold_words.insert(Arc::from(key), count);
            return false;
        }

        // a new, above threshold word
        let term: Arc<str> = Arc::from(key);
        self.words.insert(Arc::clone(&term), count);

        let key_len = len(key) as i64;
        if key_len > self.max_length {
            self.max_length = key_len;
        }

        self.index_term(&term);
        true
    }

    /// Delete an entry from the dictionary and every delete-variant bucket
    /// pointing at it. Returns false if the word is not present.
    pub fn delete_dictionary_entry(&mut self, key: &str) -> bool {
        if self.words.remove(key).is_none() {
            return false;
        }
        // max_length intentionally stays an upper bound

        for delete in self.edits_prefix(key) {
            let delete_hash = hash64(delete.as_bytes());
            if let Some(bucket) = self.deletes.get_mut(&delete_hash) {
                bucket.retain(|term| &**term != key);
                if bucket.is_empty() {
                    self.deletes.remove(&delete_hash);
                }
            }
        }
        true
    }

    /// Load multiple dictionary entries from a file of word/frequency count
    /// pairs. Merges with any dictionary data already loaded.
    ///
    /// # Arguments
    ///
    /// * `path` - The path of the dictionary file.
    /// * `term_index` - The column position of the word.
    /// * `count_index` - The column position of the frequency count.
    /// * `separator` - Separator between columns; `None` splits on any
    ///   whitespace run.
    ///
    /// Returns whether any entry was accepted. Malformed lines are skipped
    /// and logged at warn level.
    pub fn load_dictionary(
        &mut self,
        path: impl AsRef<Path>,
        term_index: usize,
        count_index: usize,
        separator: Option<&str>,
    ) -> Result<bool> {
        let file = File::open(path)?;
        self.load_dictionary_stream(BufReader::new(file), term_index, count_index, separator)
    }

    /// Load dictionary entries from any buffered reader of word/frequency
    /// lines. See [`SymSpell::load_dictionary`].
    pub fn load_dictionary_stream<R: BufRead>(
        &mut self,
        mut reader: R,
        term_index: usize,
        count_index: usize,
        separator: Option<&str>,
    ) -> Result<bool> {
        if term_index == count_index {
            return Err(Error::InvalidConfig(
                "term_index and count_index cannot point at the same column".to_string(),
            ));
        }
        let mut any_accepted = false;
        let mut rejected = 0usize;
        let mut line_number = 0usize;
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_number += 1;
            let line = String::from_utf8_lossy(&buffer);
            let line = line.trim_end_matches(['\n', '\r']);
            match parse_entry_line(line, term_index, count_index, separator) {
                Some((term, entry_count)) => {
                    self.create_dictionary_entry(term, entry_count);
                    any_accepted = true;
                }
                None => {
                    if !line.is_empty() {
                        rejected += 1;
                        warn!(line_number, "skipping malformed dictionary line");
                    }
                }
            }
        }
        if rejected > 0 {
            warn!(rejected, "dictionary entries rejected during load");
        }
        Ok(any_accepted)
    }

    /// Load bigram entries from a file of bigram/frequency count pairs. Only
    /// used by [`SymSpell::lookup_compound`] for improved splitting/merging
    /// quality.
    ///
    /// With the default whitespace separator the bigram key is the pair of
    /// adjacent tokens at `term_index` and `term_index + 1`; with a custom
    /// separator the single `term_index` column holds the whole key.
    pub fn load_bigram_dictionary(
        &mut self,
        path: impl AsRef<Path>,
        term_index: usize,
        count_index: usize,
        separator: Option<&str>,
    ) -> Result<bool> {
        let file = File::open(path)?;
        self.load_bigram_dictionary_stream(BufReader::new(file), term_index, count_index, separator)
    }

    pub fn load_bigram_dictionary_stream<R: BufRead>(
        &mut self,
        mut reader: R,
        term_index: usize,
        count_index: usize,
        separator: Option<&str>,
    ) -> Result<bool> {
        if term_index == count_index {
            return Err(Error::InvalidConfig(
                "term_index and count_index cannot point at the same column".to_string(),
            ));
        }
        let mut any_accepted = false;
        let mut rejected = 0usize;
        let mut line_number = 0usize;
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_number += 1;
            let line = String::from_utf8_lossy(&buffer);
            let line = line.trim_end_matches(['\n', '\r']);
            match parse_bigram_line(line, term_index, count_index, separator) {
                Some((key, entry_count)) => {
                    self.bigrams.insert(key.into_boxed_str(), entry_count);
                    if entry_count < self.bigram_count_min {
                        self.bigram_count_min = entry_count;
                    }
                    any_accepted = true;
                }
                None => {
                    if !line.is_empty() {
                        rejected += 1;
                        warn!(line_number, "skipping malformed bigram line");
                    }
                }
            }
        }
        if rejected > 0 {
            warn!(rejected, "bigram entries rejected during load");
        }
        Ok(any_accepted)
    }

    /// Build the dictionary from a plain-text corpus, counting every word
    /// token occurrence once. Tokens are Unicode letter runs; digits and
    /// punctuation never form tokens.
    pub fn create_dictionary(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let file = File::open(path)?;
        self.create_dictionary_stream(BufReader::new(file))
    }

    pub fn create_dictionary_stream<R: BufRead>(&mut self, mut reader: R) -> Result<bool> {
        let mut any_accepted = false;
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buffer);
            for token in corpus_tokens(&line) {
                self.create_dictionary_entry(&token, 1);
                any_accepted = true;
            }
        }
        Ok(any_accepted)
    }

    /// Find suggested spellings for a given input word.
    ///
    /// # Arguments
    ///
    /// * `input` - The word being spell checked.
    /// * `verbosity` - The value controlling the quantity/closeness of the
    ///   returned suggestions.
    /// * `max_edit_distance` - The maximum edit distance between input and
    ///   suggested words. Must not exceed the dictionary precalculation
    ///   distance.
    /// * `include_unknown` - Whether to return the input itself (with
    ///   distance `max_edit_distance + 1`) when nothing is found.
    /// * `ignore_token` - Inputs matching this pattern are returned
    ///   unchanged.
    /// * `transfer_casing` - Whether to carry the casing of `input` over to
    ///   the suggestions.
    ///
    /// # Examples
    ///
    /// ```
    /// use symcorrect::{SymSpell, Verbosity};
    ///
    /// let mut symspell = SymSpell::new(2, 7, 1).unwrap();
    /// symspell.create_dictionary_entry("house", 231_310_420);
    /// symspell.create_dictionary_entry("hose", 12_345);
    ///
    /// let suggestions = symspell
    ///     .lookup("hous", Verbosity::Top, 2, false, None, false)
    ///     .unwrap();
    /// assert_eq!("house", suggestions[0].term);
    /// assert_eq!(1, suggestions[0].distance);
    /// ```
    pub fn lookup(
        &self,
        input: &str,
        verbosity: Verbosity,
        max_edit_distance: i64,
        include_unknown: bool,
        ignore_token: Option<&Regex>,
        transfer_casing: bool,
    ) -> Result<Vec<Suggestion>> {
        if max_edit_distance > self.max_dictionary_edit_distance {
            return Err(Error::DistanceTooLarge {
                max_edit_distance,
                limit: self.max_dictionary_edit_distance,
            });
        }

        let original_input = input;
        let lowered;
        let input: &str = if transfer_casing {
            lowered = original_input.to_lowercase();
            &lowered
        } else {
            original_input
        };
        let input_len = len(input) as i64;

        let mut suggestions: Vec<Suggestion> = Vec::new();

        'search: {
            // early termination - word is too big to possibly match any words
            if input_len - max_edit_distance > self.max_length {
                break 'search;
            }

            if let Some(&suggestion_count) = self.words.get(input) {
                suggestions.push(Suggestion::new(original_input, 0, suggestion_count));
                // early termination - return exact match, unless caller wants
                // all matches
                if verbosity != Verbosity::All {
                    break 'search;
                }
            }

            if let Some(pattern) = ignore_token {
                if matches_at_start(pattern, input) {
                    suggestions.push(Suggestion::new(original_input, 0, 1));
                    if verbosity != Verbosity::All {
                        break 'search;
                    }
                }
            }

            // early termination, if we only want to check whether the word is
            // in the dictionary or get its frequency, e.g. for word
            // segmentation
            if max_edit_distance == 0 {
                break 'search;
            }

            let mut considered_deletes: AHashSet<String> = AHashSet::new();
            let mut considered_suggestions: AHashSet<String> = AHashSet::new();
            considered_suggestions.insert(input.to_string());

            let mut max_edit_distance_2 = max_edit_distance;
            let mut candidate_pointer = 0;
            let mut candidates: Vec<String> = Vec::new();

            let mut input_prefix_len = input_len;
            if input_prefix_len > self.prefix_length {
                input_prefix_len = self.prefix_length;
                candidates.push(slice(input, 0, input_prefix_len as usize));
            } else {
                candidates.push(input.to_string());
            }

            while candidate_pointer < candidates.len() {
                let candidate = candidates[candidate_pointer].clone();
                candidate_pointer += 1;
                let candidate_len = len(&candidate) as i64;
                let length_diff = input_prefix_len - candidate_len;

                // early termination: if the candidate distance is already
                // higher than the suggestion distance, no better suggestions
                // can be expected
                if length_diff > max_edit_distance_2 {
                    // skip to the next candidate under Verbosity::All, look no
                    // further under Top or Closest (candidates are ordered by
                    // delete distance, so none are closer than the current)
                    if verbosity == Verbosity::All {
                        continue;
                    }
                    break;
                }

                if let Some(dict_suggestions) = self.deletes.get(&hash64(candidate.as_bytes())) {
                    for suggestion in dict_suggestions {
                        if suggestion.as_ref() == input {
                            continue;
                        }
                        let suggestion_len = len(suggestion) as i64;

                        // input and suggestion lengths differ more than the
                        // current best distance; or the suggestion is in this
                        // bucket only because of a hash collision
                        if (suggestion_len - input_len).abs() > max_edit_distance_2
                            || suggestion_len < candidate_len
                            || (suggestion_len == candidate_len
                                && suggestion.as_ref() != candidate)
                        {
                            continue;
                        }

                        let sugg_prefix_len = min(suggestion_len, self.prefix_length);
                        if sugg_prefix_len > input_prefix_len
                            && sugg_prefix_len - candidate_len > max_edit_distance_2
                        {
                            continue;
                        }

                        // We allow simultaneous edits (deletes) of
                        // max_edit_distance on both the dictionary and the
                        // input term. For replaces and adjacent transposes the
                        // resulting edit distance stays <= max_edit_distance;
                        // for inserts and deletes it might exceed it, so the
                        // exact distance is computed where the shortcuts below
                        // cannot bound it.
                        // Example: bank==bnak and bank==bink, but bank!=kanb
                        // and bank!=xban and bank!=baxn for max_edit_distance=1.
                        let distance;
                        if candidate_len == 0 {
                            // suggestions which have no chars in common with
                            // the input (both within max_edit_distance of "")
                            distance = max(input_len, suggestion_len);
                            if distance > max_edit_distance_2
                                || considered_suggestions.contains(suggestion.as_ref())
                            {
                                continue;
                            }
                            considered_suggestions.insert(suggestion.to_string());
                        } else if suggestion_len == 1 {
                            distance = if !input.contains(&slice(suggestion, 0, 1)) {
                                input_len
                            } else {
                                input_len - 1
                            };
                            if distance > max_edit_distance_2
                                || considered_suggestions.contains(suggestion.as_ref())
                            {
                                continue;
                            }
                            considered_suggestions.insert(suggestion.to_string());
                        // number of edits in the prefix == max_edit_distance
                        // AND no identical suffix: then the edit distance
                        // exceeds max_edit_distance and there is no need for a
                        // distance calculation
                        } else if self.has_different_suffix(
                            max_edit_distance,
                            input,
                            input_len,
                            candidate_len,
                            suggestion,
                            suggestion_len,
                        ) {
                            continue;
                        } else {
                            // delete_in_suggestion_prefix is somewhat
                            // expensive and only pays off when verbosity is
                            // Top or Closest
                            if verbosity != Verbosity::All
                                && !self.delete_in_suggestion_prefix(
                                    &candidate,
                                    candidate_len,
                                    suggestion,
                                    suggestion_len,
                                )
                            {
                                continue;
                            }
                            if considered_suggestions.contains(suggestion.as_ref()) {
                                continue;
                            }
                            considered_suggestions.insert(suggestion.to_string());

                            distance = self.distance_comparer.compare(
                                input,
                                suggestion,
                                max_edit_distance_2,
                            );
                            if distance < 0 {
                                continue;
                            }
                        }

                        // do not process higher distances than those already
                        // found, if verbosity < All (note: max_edit_distance_2
                        // always equals max_edit_distance for Verbosity::All)
                        if distance <= max_edit_distance_2 {
                            let Some(&suggestion_count) = self.words.get(suggestion.as_ref())
                            else {
                                continue;
                            };
                            let si =
                                Suggestion::new(suggestion.as_ref(), distance, suggestion_count);

                            if !suggestions.is_empty() {
                                match verbosity {
                                    Verbosity::Closest => {
                                        // the distance comparer only ran up to
                                        // the smallest distance found so far
                                        if distance < max_edit_distance_2 {
                                            suggestions.clear();
                                        }
                                    }
                                    Verbosity::Top => {
                                        if distance < max_edit_distance_2
                                            || suggestion_count > suggestions[0].count
                                        {
                                            max_edit_distance_2 = distance;
                                            suggestions[0] = si;
                                        }
                                        continue;
                                    }
                                    Verbosity::All => (),
                                }
                            }

                            if verbosity != Verbosity::All {
                                max_edit_distance_2 = distance;
                            }
                            suggestions.push(si);
                        }
                    }
                }

                // derive edits (deletes) from the candidate and add them to
                // the candidate queue; this repeats until the maximum edit
                // distance has been reached
                if length_diff < max_edit_distance && candidate_len <= self.prefix_length {
                    // do not create edits with an edit distance smaller than
                    // the suggestions already found
                    if verbosity != Verbosity::All && length_diff >= max_edit_distance_2 {
                        continue;
                    }
                    for i in 0..candidate_len {
                        let delete = remove(&candidate, i as usize);
                        if !considered_deletes.contains(&delete) {
                            considered_deletes.insert(delete.clone());
                            candidates.push(delete);
                        }
                    }
                }
            }

            // sort by ascending edit distance, then by descending word
            // frequency
            if suggestions.len() > 1 {
                suggestions.sort();
            }
        }

        if transfer_casing {
            for suggestion in suggestions.iter_mut().filter(|s| s.distance > 0) {
                suggestion.term = case_transfer_similar(original_input, &suggestion.term)?;
            }
        }

        if include_unknown && suggestions.is_empty() {
            suggestions.push(Suggestion::new(original_input, max_edit_distance + 1, 0));
        }

        Ok(suggestions)
    }

    /// Find a suggested spelling for a multi-word input string.
    ///
    /// Supports compound aware automatic spelling correction with three
    /// cases:
    /// 1. a mistakenly inserted space in a correct word led to two incorrect
    ///    terms
    /// 2. a mistakenly omitted space between two correct words led to one
    ///    incorrect combined term
    /// 3. multiple independent input terms with/without spelling errors
    ///
    /// # Arguments
    ///
    /// * `phrase` - The sentence being spell checked.
    /// * `max_edit_distance` - The maximum edit distance per single word, not
    ///   per whole input string.
    /// * `ignore_non_words` - Leave numbers and acronyms unchanged.
    /// * `transfer_casing` - Carry the casing of `phrase` over to the output.
    /// * `split_by_space` - Tokenize on whitespace only instead of the word
    ///   scanner.
    ///
    /// Returns a single [`Suggestion`] whose term is the space-joined
    /// corrected phrase.
    ///
    /// # Examples
    ///
    /// ```
    /// use symcorrect::SymSpell;
    ///
    /// let mut symspell = SymSpell::new(2, 7, 1).unwrap();
    /// for (term, count) in [("where", 2), ("is", 2), ("the", 2), ("love", 2)] {
    ///     symspell.create_dictionary_entry(term, count);
    /// }
    ///
    /// let suggestions = symspell
    ///     .lookup_compound("whereis th elove", 2, false, false, false)
    ///     .unwrap();
    /// assert_eq!("where is the love", suggestions[0].term);
    /// ```
    pub fn lookup_compound(
        &self,
        phrase: &str,
        max_edit_distance: i64,
        ignore_non_words: bool,
        transfer_casing: bool,
        split_by_space: bool,
    ) -> Result<Vec<Suggestion>> {
        if max_edit_distance > self.max_dictionary_edit_distance {
            return Err(Error::DistanceTooLarge {
                max_edit_distance,
                limit: self.max_dictionary_edit_distance,
            });
        }

        // parse the input into single terms; a second, case-preserved list
        // drives acronym detection
        let term_list_1 = parse_words(phrase, false, split_by_space);
        let term_list_2 = if ignore_non_words {
            parse_words(phrase, true, split_by_space)
        } else {
            Vec::new()
        };

        let mut suggestion_parts: Vec<Suggestion> = Vec::new();

        // translate every term to its best suggestion, otherwise it stays
        // unchanged
        let mut is_last_combi = false;
        for i in 0..term_list_1.len() {
            if ignore_non_words {
                if term_list_1[i].parse::<i64>().is_ok() {
                    suggestion_parts.push(Suggestion::new(&term_list_1[i], 0, 0));
                    continue;
                }
                if is_acronym(&term_list_2[i], true) {
                    suggestion_parts.push(Suggestion::new(&term_list_2[i], 0, 0));
                    continue;
                }
            }

            let suggestions = self.lookup(
                &term_list_1[i],
                Verbosity::Top,
                max_edit_distance,
                false,
                None,
                false,
            )?;

            // combi check, always before split
            if i > 0 && !is_last_combi {
                let combined = format!("{}{}", term_list_1[i - 1], term_list_1[i]);
                let mut suggestions_combi = self.lookup(
                    &combined,
                    Verbosity::Top,
                    max_edit_distance,
                    false,
                    None,
                    false,
                )?;

                if !suggestions_combi.is_empty() {
                    let best_1 = suggestion_parts[suggestion_parts.len() - 1].clone();
                    let best_2 = if let Some(best) = suggestions.first() {
                        best.clone()
                    } else {
                        // unknown word, with its estimated occurrence count
                        Suggestion::new(
                            &term_list_1[i],
                            max_edit_distance + 1,
                            unknown_word_count(len(&term_list_1[i])),
                        )
                    };

                    // edit distance of the two split terms against their best
                    // corrections, as the comparative value for the
                    // combination
                    let distance_1 = best_1.distance + best_2.distance;
                    if distance_1 >= 0
                        && (suggestions_combi[0].distance + 1 < distance_1
                            || (suggestions_combi[0].distance + 1 == distance_1
                                && (suggestions_combi[0].count as f64
                                    > best_1.count as f64 / self.corpus_word_count as f64
                                        * best_2.count as f64)))
                    {
                        suggestions_combi[0].distance += 1;
                        let last = suggestion_parts.len() - 1;
                        suggestion_parts[last] = suggestions_combi.swap_remove(0);
                        is_last_combi = true;
                        continue;
                    }
                }
            }
            is_last_combi = false;

            // always split terms without suggestion / never split terms with
            // a perfect suggestion / never split single char terms
            if suggestions
                .first()
                .is_some_and(|s| s.distance == 0 || len(&term_list_1[i]) == 1)
            {
                suggestion_parts.push(suggestions[0].clone());
            } else {
                // if no perfect suggestion, split the word into pairs
                let mut suggestion_split_best: Option<Suggestion> = suggestions.first().cloned();

                let term_len = len(&term_list_1[i]);
                if term_len > 1 {
                    for j in 1..term_len {
                        let part_1 = slice(&term_list_1[i], 0, j);
                        let part_2 = slice(&term_list_1[i], j, term_len);

                        let suggestions_1 = self.lookup(
                            &part_1,
                            Verbosity::Top,
                            max_edit_distance,
                            false,
                            None,
                            false,
                        )?;
                        if suggestions_1.is_empty() {
                            continue;
                        }
                        let suggestions_2 = self.lookup(
                            &part_2,
                            Verbosity::Top,
                            max_edit_distance,
                            false,
                            None,
                            false,
                        )?;
                        if suggestions_2.is_empty() {
                            continue;
                        }

                        let split_term =
                            format!("{} {}", suggestions_1[0].term, suggestions_2[0].term);
                        let mut split_distance = self.distance_comparer.compare(
                            &term_list_1[i],
                            &split_term,
                            max_edit_distance,
                        );
                        if split_distance < 0 {
                            split_distance = max_edit_distance + 1;
                        }

                        if let Some(best) = &suggestion_split_best {
                            if split_distance > best.distance {
                                continue;
                            }
                            if split_distance < best.distance {
                                suggestion_split_best = None;
                            }
                        }

                        let split_count = match self.bigrams.get(split_term.as_str()) {
                            Some(&bigram_frequency) => {
                                let concatenated =
                                    format!("{}{}", suggestions_1[0].term, suggestions_2[0].term);
                                // boost the count when the split corrections
                                // are part of, or identical to, the input and
                                // would otherwise lose to the single term
                                // correction
                                if let Some(best_si) = suggestions.first() {
                                    if concatenated == term_list_1[i] {
                                        max(bigram_frequency, best_si.count + 2)
                                    } else if suggestions_1[0].term == best_si.term
                                        || suggestions_2[0].term == best_si.term
                                    {
                                        max(bigram_frequency, best_si.count + 1)
                                    } else {
                                        bigram_frequency
                                    }
                                } else if concatenated == term_list_1[i] {
                                    max(
                                        bigram_frequency,
                                        max(suggestions_1[0].count, suggestions_2[0].count) + 2,
                                    )
                                } else {
                                    bigram_frequency
                                }
                            }
                            None => {
                                // The Naive Bayes probability of the word
                                // combination is the product of the two word
                                // probabilities, P(AB) = P(A) * P(B); use it
                                // to estimate the frequency of a pair missing
                                // from the bigram dictionary
                                min(
                                    self.bigram_count_min,
                                    (suggestions_1[0].count as f64
                                        / self.corpus_word_count as f64
                                        * suggestions_2[0].count as f64)
                                        as u64,
                                )
                            }
                        };

                        let suggestion_split =
                            Suggestion::new(split_term, split_distance, split_count);
                        if suggestion_split_best
                            .as_ref()
                            .map_or(true, |best| suggestion_split.count > best.count)
                        {
                            suggestion_split_best = Some(suggestion_split);
                        }
                    }

                    match suggestion_split_best {
                        Some(best) => suggestion_parts.push(best),
                        None => suggestion_parts.push(Suggestion::new(
                            &term_list_1[i],
                            max_edit_distance + 1,
                            unknown_word_count(term_len),
                        )),
                    }
                } else {
                    suggestion_parts.push(Suggestion::new(
                        &term_list_1[i],
                        max_edit_distance + 1,
                        unknown_word_count(term_len),
                    ));
                }
            }
        }

        if suggestion_parts.is_empty() {
            return Ok(vec![Suggestion::empty()]);
        }

        let mut joined_term = String::new();
        // the weakest link: the smallest surviving frequency across parts
        let mut joined_count = u64::MAX;
        for part in &suggestion_parts {
            joined_term.push_str(&part.term);
            joined_term.push(' ');
            joined_count = min(joined_count, part.count);
        }
        let mut joined_term = joined_term.trim_end().to_string();
        if transfer_casing {
            joined_term = case_transfer_similar(phrase, &joined_term)?;
        }
        let joined_distance = self
            .distance_comparer
            .compare(phrase, &joined_term, i64::MAX);

        Ok(vec![Suggestion::new(
            joined_term,
            joined_distance,
            joined_count,
        )])
    }

    /// Divide a string into words by inserting missing spaces at the
    /// appropriate positions. Misspelled words are corrected and do not
    /// obstruct segmentation; existing spaces are allowed and considered for
    /// optimum segmentation. Letter casing is retained in the output.
    ///
    /// Uses an iterative approach with a circular composition window. While
    /// each string of length n can be segmented into 2^n-1 possible
    /// compositions, this finds the optimum one in linear time.
    /// <https://seekstorm.com/blog/fast-word-segmentation-noisy-text/>
    ///
    /// # Arguments
    ///
    /// * `phrase` - The string being segmented.
    /// * `max_edit_distance` - The maximum edit distance per looked-up part
    ///   (0 = segmentation only, no correction).
    /// * `max_segmentation_word_length` - The longest part length considered;
    ///   defaults to the configured prefix length.
    /// * `ignore_token` - Parts matching this pattern pass through unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use symcorrect::SymSpell;
    ///
    /// let mut symspell = SymSpell::new(2, 7, 1).unwrap();
    /// for (term, count) in [("the", 60), ("quick", 40), ("brown", 30), ("fox", 20)] {
    ///     symspell.create_dictionary_entry(term, count);
    /// }
    ///
    /// let result = symspell
    ///     .word_segmentation("thequickbrownfox", 0, None, None)
    ///     .unwrap();
    /// assert_eq!("the quick brown fox", result.corrected_string);
    /// assert_eq!(3, result.distance_sum);
    /// ```
    pub fn word_segmentation(
        &self,
        phrase: &str,
        max_edit_distance: i64,
        max_segmentation_word_length: Option<usize>,
        ignore_token: Option<&Regex>,
    ) -> Result<Composition> {
        if max_edit_distance > self.max_dictionary_edit_distance {
            return Err(Error::DistanceTooLarge {
                max_edit_distance,
                limit: self.max_dictionary_edit_distance,
            });
        }

        let phrase_len = len(phrase);
        if phrase_len == 0 {
            return Ok(Composition::empty());
        }
        let max_word_len = max_segmentation_word_length
            .unwrap_or(self.prefix_length as usize)
            .max(1);
        let array_size = min(max_word_len, phrase_len);
        let mut compositions: Vec<Composition> = vec![Composition::empty(); array_size];
        let mut circular_index: isize = -1;

        // outer loop: all possible part start positions
        for j in 0..phrase_len {
            // inner loop: all possible part lengths from this start position;
            // a part can't be longer than the longest dictionary word, other
            // than as a long unknown word
            let imax = min(phrase_len - j, max_word_len);
            for i in 1..=imax {
                let mut part = slice(phrase, j, j + i);
                let mut separator_len: i64 = 0;
                let mut top_ed: i64 = 0;

                if part.chars().next().is_some_and(char::is_whitespace) {
                    // remove the space for the distance calculation
                    part = helpers::suffix(&part, 1);
                } else {
                    // the space did not exist and has to be inserted
                    separator_len = 1;
                }

                // count removed interior spaces into the edit distance
                top_ed += len(&part) as i64;
                part = part.replace(' ', "");
                top_ed -= len(&part) as i64;

                // fold ligatures before scoring: "ﬁelds" -> "fields"
                part = normalize_nfkc(&part);

                let results = self.lookup(
                    &part.to_lowercase(),
                    Verbosity::Top,
                    max_edit_distance,
                    false,
                    ignore_token,
                    false,
                )?;
                let (top_result, top_log_prob) = if let Some(top) = results.first() {
                    let top_result = if top.distance == 0 {
                        part.clone()
                    } else if part.is_empty() {
                        top.term.clone()
                    } else {
                        // keep the letter case of the input part on the
                        // corrected word
                        case_transfer_similar(&part, &top.term)?
                    };
                    top_ed += top.distance;
                    // Naive Bayes Rule: word probabilities are assumed
                    // independent, so the probability of the composition is
                    // their product. Summing logarithms instead of
                    // multiplying avoids float underflow, since word
                    // probabilities sit around 10^-10.
                    (
                        top_result,
                        (top.count as f64 / self.corpus_word_count as f64).log10(),
                    )
                } else {
                    // unknown word: without this penalty a long input would
                    // win as one long unknown word instead of receiving the
                    // many spaces it needs
                    let part_len = len(&part) as i64;
                    top_ed += part_len;
                    (
                        part.clone(),
                        (10.0 / (self.corpus_word_count as f64 * 10f64.powi(part_len as i32)))
                            .log10(),
                    )
                };

                let dest = (i as isize + circular_index).rem_euclid(array_size as isize) as usize;
                if j == 0 {
                    // the first column seeds every window slot
                    compositions[dest] = Composition {
                        segmented_string: part.clone(),
                        corrected_string: top_result,
                        distance_sum: top_ed,
                        log_prob_sum: top_log_prob,
                    };
                } else {
                    let ci = circular_index as usize;
                    // replace the stored composition at the window edge; on a
                    // smaller edit distance; or on an equal distance (up to
                    // one separator) with a better probability
                    if i == max_word_len
                        || ((compositions[ci].distance_sum + top_ed
                            == compositions[dest].distance_sum
                            || compositions[ci].distance_sum + separator_len + top_ed
                                == compositions[dest].distance_sum)
                            && compositions[dest].log_prob_sum
                                < compositions[ci].log_prob_sum + top_log_prob)
                        || compositions[ci].distance_sum + separator_len + top_ed
                            < compositions[dest].distance_sum
                    {
                        compositions[dest] = Composition {
                            segmented_string: format!(
                                "{} {}",
                                compositions[ci].segmented_string, part
                            ),
                            corrected_string: format!(
                                "{} {}",
                                compositions[ci].corrected_string, top_result
                            ),
                            distance_sum: compositions[ci].distance_sum + separator_len + top_ed,
                            log_prob_sum: compositions[ci].log_prob_sum + top_log_prob,
                        };
                    }
                }
            }
            circular_index = if circular_index + 1 == array_size as isize {
                0
            } else {
                circular_index + 1
            };
        }
        Ok(compositions[circular_index as usize].clone())
    }

    /// Persist the engine state (words, bigrams and settings) to a writer.
    /// The delete index itself is not written; it is rebuilt on load.
    pub fn save_state<W: Write>(&self, writer: W) -> Result<()> {
        let state = SymSpellState {
            data_version: DATA_VERSION,
            max_dictionary_edit_distance: self.max_dictionary_edit_distance,
            prefix_length: self.prefix_length,
            count_threshold: self.count_threshold,
            max_length: self.max_length,
            bigram_count_min: self.bigram_count_min,
            words: self
                .words
                .iter()
                .map(|(term, &count)| (term.to_string(), count))
                .collect(),
            below_threshold_words: self
                .below_threshold_words
                .iter()
                .map(|(term, &count)| (term.to_string(), count))
                .collect(),
            bigrams: self
                .bigrams
                .iter()
                .map(|(key, &count)| (key.to_string(), count))
                .collect(),
        };
        bincode::serialize_into(writer, &state)?;
        Ok(())
    }

    pub fn save_state_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_state(BufWriter::new(File::create(path)?))
    }

    /// Replace the engine state with a snapshot previously written by
    /// [`SymSpell::save_state`]. Settings stored in the snapshot overwrite
    /// the engine's; a mismatch is logged at warn level.
    pub fn load_state<R: Read>(&mut self, reader: R) -> Result<()> {
        let state: SymSpellState = bincode::deserialize_from(reader)?;
        if state.data_version != DATA_VERSION {
            return Err(Error::DataVersionMismatch {
                expected: DATA_VERSION,
                found: state.data_version,
            });
        }
        if state.max_dictionary_edit_distance != self.max_dictionary_edit_distance
            || state.prefix_length != self.prefix_length
            || state.count_threshold != self.count_threshold
        {
            warn!(
                max_dictionary_edit_distance = state.max_dictionary_edit_distance,
                prefix_length = state.prefix_length,
                count_threshold = state.count_threshold,
                "state snapshot was created with different settings, overwriting current settings"
            );
        }
        self.max_dictionary_edit_distance = state.max_dictionary_edit_distance;
        self.prefix_length = state.prefix_length;
        self.count_threshold = state.count_threshold;
        self.max_length = state.max_length;
        self.bigram_count_min = state.bigram_count_min;

        self.below_threshold_words = state
            .below_threshold_words
            .into_iter()
            .map(|(term, count)| (Arc::from(term.as_str()), count))
            .collect();
        self.bigrams = state
            .bigrams
            .into_iter()
            .map(|(key, count)| (key.into_boxed_str(), count))
            .collect();

        // rebuild the delete index; inserting in sorted order keeps bucket
        // contents deterministic across save/load cycles
        self.words = AHashMap::with_capacity(state.words.len());
        self.deletes = AHashMap::new();
        let mut entries: Vec<(String, u64)> = state.words.into_iter().collect();
        entries.sort();
        for (term, count) in entries {
            let term: Arc<str> = Arc::from(term.as_str());
            self.words.insert(Arc::clone(&term), count);
            self.index_term(&term);
        }
        Ok(())
    }

    pub fn load_state_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.load_state(BufReader::new(File::open(path)?))
    }

    // Append the term to the bucket of every delete variant of its prefix.
    fn index_term(&mut self, term: &Arc<str>) {
        for delete in self.edits_prefix(term) {
            let delete_hash = hash64(delete.as_bytes());
            let bucket = self.deletes.entry(delete_hash).or_default();
            if !bucket.iter().any(|existing| existing == term) {
                bucket.push(Arc::clone(term));
            }
        }
    }

    fn edits_prefix(&self, key: &str) -> AHashSet<String> {
        let mut hash_set = AHashSet::new();

        let key_len = len(key) as i64;
        if key_len <= self.max_dictionary_edit_distance {
            hash_set.insert(String::new());
        }

        if key_len > self.prefix_length {
            let shortened_key = slice(key, 0, self.prefix_length as usize);
            hash_set.insert(shortened_key.clone());
            self.edits(&shortened_key, 0, &mut hash_set);
        } else {
            hash_set.insert(key.to_string());
            self.edits(key, 0, &mut hash_set);
        }

        hash_set
    }

    // inexpensive and language independent: only deletes, no transposes +
    // replaces + inserts
    fn edits(&self, word: &str, edit_distance: i64, delete_words: &mut AHashSet<String>) {
        let edit_distance = edit_distance + 1;
        let word_len = len(word);

        if word_len > 1 {
            for i in 0..word_len {
                let delete = remove(word, i);

                if !delete_words.contains(&delete) {
                    delete_words.insert(delete.clone());

                    if edit_distance < self.max_dictionary_edit_distance {
                        self.edits(&delete, edit_distance, delete_words);
                    }
                }
            }
        }
    }

    // Check whether all delete chars are present in the suggestion prefix in
    // the correct order; otherwise this is just a hash collision.
    fn delete_in_suggestion_prefix(
        &self,
        delete: &str,
        delete_len: i64,
        suggestion: &str,
        suggestion_len: i64,
    ) -> bool {
        if delete_len == 0 {
            return true;
        }
        let suggestion_len = min(self.prefix_length, suggestion_len);
        let mut j = 0;
        for i in 0..delete_len {
            let Some(del_char) = helpers::at(delete, i as isize) else {
                return false;
            };
            while j < suggestion_len && Some(del_char) != helpers::at(suggestion, j as isize) {
                j += 1;
            }
            if j == suggestion_len {
                return false;
            }
        }
        true
    }

    fn has_different_suffix(
        &self,
        max_edit_distance: i64,
        input: &str,
        input_len: i64,
        candidate_len: i64,
        suggestion: &str,
        suggestion_len: i64,
    ) -> bool {
        // handles the short circuit of the min_distance assignment when the
        // first boolean expression evaluates to false
        let min_distance = if self.prefix_length - max_edit_distance == candidate_len {
            min(input_len, suggestion_len) - self.prefix_length
        } else {
            0
        };

        (self.prefix_length - max_edit_distance == candidate_len)
            && (((min_distance - self.prefix_length) > 1)
                && (helpers::suffix(input, (input_len + 1 - min_distance) as usize)
                    != helpers::suffix(suggestion, (suggestion_len + 1 - min_distance) as usize)))
            || ((min_distance > 0)
                && (helpers::at(input, (input_len - min_distance) as isize)
                    != helpers::at(suggestion, (suggestion_len - min_distance) as isize))
                && ((helpers::at(input, (input_len - min_distance - 1) as isize)
                    != helpers::at(suggestion, (suggestion_len - min_distance) as isize))
                    || (helpers::at(input, (input_len - min_distance) as isize)
                        != helpers::at(
                            suggestion,
                            (suggestion_len - min_distance - 1) as isize,
                        ))))
    }
}

fn parse_entry_line<'a>(
    line: &'a str,
    term_index: usize,
    count_index: usize,
    separator: Option<&str>,
) -> Option<(&'a str, u64)> {
    let parts: Vec<&str> = match separator {
        None => line.split_whitespace().collect(),
        Some(sep) => line.split(sep).collect(),
    };
    let term = *parts.get(term_index)?;
    if term.is_empty() {
        return None;
    }
    let count = parts.get(count_index)?.parse::<u64>().ok()?;
    Some((term, count))
}

fn parse_bigram_line(
    line: &str,
    term_index: usize,
    count_index: usize,
    separator: Option<&str>,
) -> Option<(String, u64)> {
    let parts: Vec<&str> = match separator {
        // the key spans two adjacent whitespace tokens
        None => {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                return None;
            }
            parts
        }
        Some(sep) => {
            let parts: Vec<&str> = line.split(sep).collect();
            if parts.len() < 2 {
                return None;
            }
            parts
        }
    };
    let key = match separator {
        None => format!("{} {}", parts.get(term_index)?, parts.get(term_index + 1)?),
        Some(_) => (*parts.get(term_index)?).to_string(),
    };
    if key.trim().is_empty() {
        return None;
    }
    let count = parts.get(count_index)?.parse::<u64>().ok()?;
    Some((key, count))
}
