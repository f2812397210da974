/// Result of `word_segmentation`: the best composition found for a phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// The input split into words, spelling untouched.
    pub segmented_string: String,
    /// The input split into words with spelling corrections applied.
    pub corrected_string: String,
    /// Edit distance sum between input string and corrected string.
    pub distance_sum: i64,
    /// Sum of word occurrence probabilities in log scale (a measure of how
    /// common and probable the corrected segmentation is).
    pub log_prob_sum: f64,
}

impl Composition {
    pub fn empty() -> Self {
        Self {
            segmented_string: String::new(),
            corrected_string: String::new(),
            distance_sum: 0,
            log_prob_sum: 0.0,
        }
    }
}
