use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Version stamp of the snapshot layout. Bumped whenever the persisted
/// fields change; loading a snapshot with a different stamp fails.
pub(crate) const DATA_VERSION: u32 = 3;

/// Everything needed to restore an engine: the dictionaries and the settings
/// they were built with. The delete index is derived data and is rebuilt on
/// load instead of being persisted.
#[derive(Serialize, Deserialize)]
pub(crate) struct SymSpellState {
    pub data_version: u32,
    pub max_dictionary_edit_distance: i64,
    pub prefix_length: i64,
    pub count_threshold: u64,
    pub max_length: i64,
    pub bigram_count_min: u64,
    pub words: HashMap<String, u64>,
    pub below_threshold_words: HashMap<String, u64>,
    pub bigrams: HashMap<String, u64>,
}
