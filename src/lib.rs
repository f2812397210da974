/*!

Spelling correction, compound correction and word segmentation based on the
Symmetric Delete algorithm.

Instead of generating the expensive transposes + replaces + inserts of an
input term, only deletes of dictionary term prefixes are precalculated and
indexed; candidates are gathered through the index and verified with an exact
edit distance. This makes lookups fast and language independent.

#### Single word spelling correction

```rust
use symcorrect::{SymSpell, Verbosity};

let mut symspell = SymSpell::new(2, 7, 1).unwrap();
// entries come from a frequency dictionary file in real use,
// see SymSpell::load_dictionary
symspell.create_dictionary_entry("house", 231_310_420);
symspell.create_dictionary_entry("hour", 70_340_818);

let suggestions = symspell
    .lookup("hous", Verbosity::Closest, 2, false, None, false)
    .unwrap();
assert_eq!("house", suggestions[0].term);
```

#### Compound aware multi-word spelling correction

```rust
use symcorrect::SymSpell;

let mut symspell = SymSpell::new(2, 7, 1).unwrap();
for (term, count) in [("can", 300), ("you", 500), ("read", 120), ("this", 400)] {
    symspell.create_dictionary_entry(term, count);
}

let suggestions = symspell
    .lookup_compound("can yu readthis", 2, false, false, false)
    .unwrap();
assert_eq!("can you read this", suggestions[0].term);
```

#### Word segmentation of noisy text

```rust
use symcorrect::SymSpell;

let mut symspell = SymSpell::new(0, 7, 1).unwrap();
for (term, count) in [("it", 100), ("was", 90), ("a", 80), ("bright", 40), ("cold", 30)] {
    symspell.create_dictionary_entry(term, count);
}

let result = symspell
    .word_segmentation("itwasabrightcold", 0, None, None)
    .unwrap();
assert_eq!("it was a bright cold", result.corrected_string);
```

*/

mod composition;
mod distance;
mod error;
mod helpers;
mod persistence;
mod suggestion;
mod symspell;
mod test;

pub use composition::Composition;
pub use distance::{
    damerau_levenshtein_osa, levenshtein, DamerauOsa, DamerauOsaFast, DistanceAlgorithm,
    DistanceComparer, EditDistance, FastVec, Levenshtein, LevenshteinFast,
};
pub use error::{Error, Result};
pub use helpers::{case_transfer_matching, case_transfer_similar, is_acronym, parse_words};
pub use suggestion::{Suggestion, Verbosity};
pub use symspell::{SymSpell, SymSpellBuilder};
