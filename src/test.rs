#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Cursor;

    use regex::Regex;

    use crate::persistence::{SymSpellState, DATA_VERSION};
    use crate::{Error, Suggestion, SymSpell, Verbosity};

    fn engine_with(entries: &[(&str, u64)]) -> SymSpell {
        let mut symspell = SymSpell::new(2, 7, 1).unwrap();
        for (term, count) in entries {
            symspell.create_dictionary_entry(term, *count);
        }
        symspell
    }

    #[test]
    fn invalid_configurations_fail_construction() {
        assert!(matches!(
            SymSpell::new(-1, 3, 1),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(SymSpell::new(1, 0, 1), Err(Error::InvalidConfig(_))));
        assert!(matches!(SymSpell::new(3, 2, 1), Err(Error::InvalidConfig(_))));
        // prefix_length equal to the edit distance is allowed
        assert!(SymSpell::new(2, 2, 1).is_ok());
    }

    #[test]
    fn below_threshold_counts_accumulate_until_promotion() {
        let mut symspell = SymSpell::new(2, 7, 10).unwrap();

        assert!(!symspell.create_dictionary_entry("pipe", 4));
        assert_eq!(1, symspell.below_threshold_word_count());
        assert_eq!(Some(4), symspell.below_threshold_frequency("pipe"));

        assert!(!symspell.create_dictionary_entry("pipe", 4));
        assert_eq!(Some(8), symspell.below_threshold_frequency("pipe"));

        // third sighting pushes the accumulated count past the threshold
        assert!(symspell.create_dictionary_entry("pipe", 4));
        assert_eq!(0, symspell.below_threshold_word_count());
        assert_eq!(Some(12), symspell.word_frequency("pipe"));
    }

    #[test]
    fn zero_counts_are_never_stored() {
        let mut symspell = SymSpell::new(2, 7, 1).unwrap();
        assert!(!symspell.create_dictionary_entry("pipe", 0));
        assert_eq!(0, symspell.word_count());
        assert_eq!(0, symspell.below_threshold_word_count());
    }

    #[test]
    fn repeated_entries_update_the_count_in_place() {
        let mut symspell = SymSpell::new(2, 7, 1).unwrap();
        let mut expected = 0;
        for count in [10, 20, 30] {
            expected += count;
            symspell.create_dictionary_entry("word", count);
            assert_eq!(1, symspell.word_count());
            assert_eq!(Some(expected), symspell.word_frequency("word"));
        }
    }

    #[test]
    fn counts_saturate_instead_of_overflowing() {
        let mut symspell = SymSpell::new(2, 7, 1).unwrap();
        symspell.create_dictionary_entry("word", u64::MAX - 1);
        symspell.create_dictionary_entry("word", 5);
        assert_eq!(Some(u64::MAX), symspell.word_frequency("word"));
    }

    #[test]
    fn verbosity_controls_the_number_of_results() {
        let symspell = engine_with(&[("steam", 1), ("steams", 2), ("steem", 3)]);

        for (verbosity, expected) in [
            (Verbosity::Top, 1),
            (Verbosity::Closest, 2),
            (Verbosity::All, 3),
        ] {
            let results = symspell
                .lookup("steems", verbosity, 2, false, None, false)
                .unwrap();
            assert_eq!(expected, results.len(), "{verbosity:?}");
        }
    }

    #[test]
    fn closest_orders_by_descending_count() {
        let symspell = engine_with(&[("steam", 1), ("steams", 2), ("steem", 3)]);
        let results = symspell
            .lookup("steems", Verbosity::Closest, 2, false, None, false)
            .unwrap();
        assert_eq!("steem", results[0].term);
        assert_eq!(1, results[0].distance);
        assert_eq!("steams", results[1].term);
    }

    #[test]
    fn growing_the_distance_bound_never_removes_suggestions() {
        let symspell = engine_with(&[("steam", 1), ("steams", 2), ("steem", 3)]);
        let narrow = symspell
            .lookup("steems", Verbosity::All, 1, false, None, false)
            .unwrap();
        let wide = symspell
            .lookup("steems", Verbosity::All, 2, false, None, false)
            .unwrap();
        assert!(!narrow.is_empty());
        for suggestion in &narrow {
            assert!(wide.contains(suggestion));
        }
    }

    #[test]
    fn words_with_shared_prefix_retain_their_counts() {
        let mut symspell = SymSpell::new(1, 3, 1).unwrap();
        symspell.create_dictionary_entry("pipe", 5);
        symspell.create_dictionary_entry("pips", 10);

        let results = symspell
            .lookup("pipe", Verbosity::All, 1, false, None, false)
            .unwrap();
        assert_eq!(2, results.len());
        assert_eq!("pipe", results[0].term);
        assert_eq!(5, results[0].count);
        assert_eq!("pips", results[1].term);
        assert_eq!(10, results[1].count);

        let results = symspell
            .lookup("pip", Verbosity::All, 1, false, None, false)
            .unwrap();
        assert_eq!(2, results.len());
        assert_eq!("pips", results[0].term);
        assert_eq!("pipe", results[1].term);
    }

    #[test]
    fn top_returns_the_most_frequent_of_the_closest() {
        let symspell = engine_with(&[("steama", 4), ("steamb", 6), ("steamc", 2)]);
        let results = symspell
            .lookup("stream", Verbosity::Top, 2, false, None, false)
            .unwrap();
        assert_eq!(1, results.len());
        assert_eq!("steamb", results[0].term);
        assert_eq!(6, results[0].count);
    }

    #[test]
    fn deletes_below_the_threshold_are_not_words() {
        let mut symspell = SymSpell::new(2, 7, 10).unwrap();
        symspell.create_dictionary_entry("pawn", 10);
        for term in ["paw", "awn"] {
            let results = symspell
                .lookup(term, Verbosity::Top, 0, false, None, false)
                .unwrap();
            assert!(results.is_empty(), "{term}");
        }

        symspell.create_dictionary_entry("flame", 20);
        symspell.create_dictionary_entry("flam", 1);
        let results = symspell
            .lookup("flam", Verbosity::Top, 0, false, None, false)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn lookup_distance_above_the_dictionary_limit_fails() {
        let symspell = engine_with(&[("flame", 20)]);
        assert!(matches!(
            symspell.lookup("flam", Verbosity::Top, 3, false, None, false),
            Err(Error::DistanceTooLarge { .. })
        ));
    }

    #[test]
    fn include_unknown_returns_the_input() {
        let mut symspell = SymSpell::new(2, 7, 10).unwrap();
        symspell.create_dictionary_entry("flame", 20);
        symspell.create_dictionary_entry("flam", 1);

        let results = symspell
            .lookup("flam", Verbosity::Top, 0, true, None, false)
            .unwrap();
        assert_eq!(1, results.len());
        assert_eq!("flam", results[0].term);
        assert_eq!(1, results[0].distance);
        assert_eq!(0, results[0].count);
    }

    #[test]
    fn ignored_tokens_pass_through() {
        let symspell = engine_with(&[("members", 226_656_153)]);
        let pattern = Regex::new(r"\w+\d").unwrap();
        let results = symspell
            .lookup("members1", Verbosity::Closest, 2, false, Some(&pattern), false)
            .unwrap();
        assert_eq!(vec![Suggestion::new("members1", 0, 1)], results);
    }

    #[test]
    fn ignored_tokens_pass_through_under_all_verbosity() {
        let mut symspell = SymSpell::new(2, 7, 10).unwrap();
        symspell.create_dictionary_entry("flame", 20);
        let pattern = Regex::new(r"\d{2}\w*\b").unwrap();
        let results = symspell
            .lookup("24th", Verbosity::All, 2, false, Some(&pattern), false)
            .unwrap();
        assert_eq!(1, results.len());
        assert_eq!("24th", results[0].term);
    }

    #[test]
    fn closest_correction_of_a_single_typo() {
        let symspell = engine_with(&[("members", 226_656_153)]);
        let results = symspell
            .lookup("memebers", Verbosity::Closest, 2, false, None, false)
            .unwrap();
        assert_eq!(vec![Suggestion::new("members", 1, 226_656_153)], results);
    }

    #[test]
    fn unknown_words_report_distance_one_past_the_bound() {
        let symspell = engine_with(&[("members", 226_656_153)]);
        let results = symspell
            .lookup("apastraphee", Verbosity::Closest, 2, true, None, false)
            .unwrap();
        assert_eq!(vec![Suggestion::new("apastraphee", 3, 0)], results);
    }

    #[test]
    fn lookup_transfers_casing_onto_suggestions() {
        for (entry, typo, correction) in [
            ("steam", "Stream", "Steam"),
            ("steam", "StreaM", "SteaM"),
            ("steam", "STREAM", "STEAM"),
            ("i", "I", "I"),
            ("members", "mEmEbers", "mEmbers"),
        ] {
            let symspell = engine_with(&[(entry, 4)]);
            let results = symspell
                .lookup(typo, Verbosity::Top, 2, false, None, true)
                .unwrap();
            assert_eq!(correction, results[0].term, "{typo}");
        }
    }

    #[test]
    fn candidates_with_no_common_characters_are_still_found() {
        let mut symspell = SymSpell::new(4, 7, 1).unwrap();
        symspell.create_dictionary_entry("bank", 10);
        symspell.create_dictionary_entry("bink", 5);

        let results = symspell
            .lookup("knab", Verbosity::All, 4, false, None, false)
            .unwrap();
        assert_eq!(2, results.len());
        assert_eq!("bank", results[0].term);
        assert_eq!(3, results[0].distance);
        assert_eq!("bink", results[1].term);
        assert_eq!(4, results[1].distance);
    }

    #[test]
    fn deleted_entries_stop_being_suggested() {
        let mut symspell = engine_with(&[("stea", 1), ("steama", 2), ("steem", 3)]);

        let results = symspell
            .lookup("steama", Verbosity::Top, 2, false, None, false)
            .unwrap();
        assert_eq!("steama", results[0].term);

        assert!(symspell.delete_dictionary_entry("steama"));
        assert_eq!(None, symspell.word_frequency("steama"));
        let results = symspell
            .lookup("steama", Verbosity::Top, 2, false, None, false)
            .unwrap();
        assert_eq!("steem", results[0].term);

        assert!(!symspell.delete_dictionary_entry("steamab"));
    }

    #[test]
    fn adding_then_removing_a_term_restores_the_index() {
        let mut symspell = engine_with(&[("steam", 1), ("steams", 2), ("steem", 3)]);
        let entries_before = symspell.entry_count();
        let results_before = symspell
            .lookup("steems", Verbosity::All, 2, false, None, false)
            .unwrap();

        symspell.create_dictionary_entry("flamingo", 10);
        assert!(symspell.delete_dictionary_entry("flamingo"));

        assert_eq!(entries_before, symspell.entry_count());
        let results_after = symspell
            .lookup("steems", Verbosity::All, 2, false, None, false)
            .unwrap();
        assert_eq!(results_before, results_after);
    }

    #[test]
    fn build_order_does_not_change_lookup_results() {
        let entries = [("steam", 1), ("steams", 2), ("steem", 3), ("stea", 4)];
        let mut reversed = entries;
        reversed.reverse();
        let forward = engine_with(&entries);
        let backward = engine_with(&reversed);

        for input in ["steems", "stea", "steama", "st"] {
            for verbosity in [Verbosity::Top, Verbosity::Closest, Verbosity::All] {
                assert_eq!(
                    forward.lookup(input, verbosity, 2, false, None, false).unwrap(),
                    backward.lookup(input, verbosity, 2, false, None, false).unwrap(),
                    "{input} {verbosity:?}"
                );
            }
        }
    }

    #[test]
    fn compound_merges_a_mistakenly_split_word() {
        let symspell = engine_with(&[("steam", 1), ("machine", 1)]);
        let results = symspell
            .lookup_compound("ste am machie", 2, false, false, false)
            .unwrap();
        assert_eq!(1, results.len());
        assert_eq!("steam machine", results[0].term);
    }

    #[test]
    fn compound_keeps_unknown_phrases_unchanged() {
        let symspell = engine_with(&[("steam", 1), ("machine", 1)]);
        let results = symspell
            .lookup_compound("qwer erty ytui a", 2, false, false, false)
            .unwrap();
        assert_eq!(1, results.len());
        assert_eq!("qwer erty ytui a", results[0].term);
        assert_eq!(0, results[0].count);
    }

    #[test]
    fn compound_splits_through_the_bigram_dictionary() {
        let mut symspell = engine_with(&[("where", 2), ("is", 2), ("whereas", 2)]);
        symspell
            .load_bigram_dictionary_stream(Cursor::new("where is 10\n"), 0, 2, None)
            .unwrap();

        let results = symspell.lookup_compound("whereiz", 2, false, false, false).unwrap();
        assert_eq!("where is", results[0].term);
        assert_eq!(2, results[0].distance);
        assert_eq!(10, results[0].count);
    }

    #[test]
    fn compound_corrects_splits_and_merges_together() {
        let symspell = engine_with(&[("where", 2), ("is", 2), ("the", 2), ("love", 2)]);
        let results = symspell
            .lookup_compound("whereis th elove", 2, false, false, false)
            .unwrap();
        assert_eq!("where is the love", results[0].term);
        assert_eq!(2, results[0].distance);
    }

    #[test]
    fn compound_transfers_casing_from_the_input() {
        let symspell = engine_with(&[("where", 2), ("is", 2), ("the", 2), ("love", 2)]);
        let results = symspell
            .lookup_compound("Whereis th elove", 2, false, true, false)
            .unwrap();
        assert_eq!("Where is the love", results[0].term);
        assert_eq!(2, results[0].distance);
    }

    #[test]
    fn compound_passes_numbers_and_acronyms_through() {
        let symspell = engine_with(&[("steam", 10), ("machine", 10)]);
        let results = symspell
            .lookup_compound("ste am machie 123 XYZ", 2, true, false, false)
            .unwrap();
        assert_eq!("steam machine 123 XYZ", results[0].term);
    }

    #[test]
    fn compound_token_count_never_grows() {
        let symspell = engine_with(&[("steam", 1), ("machine", 1)]);
        for phrase in ["ste am machie", "steam machine", "qwer erty"] {
            let results = symspell
                .lookup_compound(phrase, 2, false, false, false)
                .unwrap();
            let input_tokens = phrase.split_whitespace().count();
            let output_tokens = results[0].term.split_whitespace().count();
            assert!(output_tokens <= input_tokens, "{phrase}");
        }
    }

    #[test]
    fn compound_of_an_empty_phrase_is_empty() {
        let symspell = engine_with(&[("steam", 1)]);
        let results = symspell.lookup_compound("", 2, false, false, false).unwrap();
        assert_eq!(1, results.len());
        assert_eq!("", results[0].term);
    }

    #[test]
    fn segmentation_inserts_missing_spaces() {
        let symspell = engine_with(&[("the", 60), ("quick", 40), ("brown", 30), ("fox", 20)]);
        let result = symspell
            .word_segmentation("thequickbrownfox", 0, None, None)
            .unwrap();
        assert_eq!("the quick brown fox", result.segmented_string);
        assert_eq!("the quick brown fox", result.corrected_string);
        assert_eq!(3, result.distance_sum);
    }

    #[test]
    fn segmentation_keeps_existing_spaces() {
        let symspell = engine_with(&[("the", 60), ("quick", 40), ("brown", 30), ("fox", 20)]);
        let result = symspell
            .word_segmentation("the quick brownfox", 0, None, None)
            .unwrap();
        assert_eq!("the quick brown fox", result.corrected_string);
        assert_eq!(1, result.distance_sum);
    }

    #[test]
    fn segmentation_is_idempotent_on_segmented_input() {
        let symspell = engine_with(&[("the", 60), ("cat", 20)]);
        let result = symspell.word_segmentation("the cat", 0, None, None).unwrap();
        assert_eq!("the cat", result.corrected_string);
        assert_eq!(0, result.distance_sum);
    }

    #[test]
    fn segmentation_corrects_misspelled_parts() {
        let symspell = engine_with(&[("the", 60), ("quick", 40), ("brown", 30), ("fox", 20)]);
        let result = symspell
            .word_segmentation("thequickbrawnfox", 1, None, None)
            .unwrap();
        assert_eq!("the quick brawn fox", result.segmented_string);
        assert_eq!("the quick brown fox", result.corrected_string);
        assert_eq!(4, result.distance_sum);
    }

    #[test]
    fn segmentation_preserves_letter_case() {
        let symspell = engine_with(&[("the", 60), ("quick", 40), ("brown", 30), ("fox", 20)]);
        let result = symspell
            .word_segmentation("THEQUICKBROWNFOX", 0, None, None)
            .unwrap();
        assert_eq!("THE QUICK BROWN FOX", result.corrected_string);
    }

    #[test]
    fn segmentation_folds_ligatures() {
        let symspell = engine_with(&[
            ("there", 50),
            ("are", 40),
            ("some", 30),
            ("scientific", 20),
            ("words", 10),
        ]);
        let result = symspell
            .word_segmentation("Therearesomescientiﬁcwords", 0, Some(11), None)
            .unwrap();
        assert_eq!("There are some scientific words", result.corrected_string);
    }

    #[test]
    fn segmentation_passes_ignored_tokens_through() {
        let symspell = engine_with(&[("december", 30)]);
        let pattern = Regex::new(r"\d{2}\w*\b").unwrap();
        let result = symspell
            .word_segmentation("24th december", 0, Some(8), Some(&pattern))
            .unwrap();
        assert_eq!("24th december", result.corrected_string);
        assert_eq!(0, result.distance_sum);
    }

    #[test]
    fn segmentation_of_an_empty_phrase_is_empty() {
        let symspell = engine_with(&[("the", 60)]);
        let result = symspell.word_segmentation("", 0, None, None).unwrap();
        assert_eq!("", result.segmented_string);
        assert_eq!("", result.corrected_string);
        assert_eq!(0, result.distance_sum);
    }

    #[test]
    fn dictionary_loads_skip_malformed_lines() {
        let mut symspell = SymSpell::new(2, 7, 1).unwrap();
        let data = "asdf 10\nbad_line\nsdfg 12\nlarge 92233720368547758081\n";
        let accepted = symspell
            .load_dictionary_stream(Cursor::new(data), 0, 1, None)
            .unwrap();
        assert!(accepted);
        assert_eq!(2, symspell.word_count());
        assert_eq!(Some(10), symspell.word_frequency("asdf"));
        assert_eq!(Some(12), symspell.word_frequency("sdfg"));
    }

    #[test]
    fn dictionary_loads_support_custom_separators() {
        let mut symspell = SymSpell::new(2, 7, 1).unwrap();
        let data = "the$23135851162\nof$13151942776\n";
        assert!(symspell
            .load_dictionary_stream(Cursor::new(data), 0, 1, Some("$"))
            .unwrap());
        assert_eq!(2, symspell.word_count());
        assert_eq!(Some(23_135_851_162), symspell.word_frequency("the"));
    }

    #[test]
    fn dictionary_loads_reject_clashing_columns() {
        let mut symspell = SymSpell::new(2, 7, 1).unwrap();
        assert!(matches!(
            symspell.load_dictionary_stream(Cursor::new("the 1\n"), 1, 1, None),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn dictionary_loads_propagate_io_errors() {
        let mut symspell = SymSpell::new(2, 7, 1).unwrap();
        assert!(matches!(
            symspell.load_dictionary("definitely/not/here.txt", 0, 1, None),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn dictionary_loads_accumulate_below_threshold_counts() {
        let mut symspell = SymSpell::new(2, 7, 10).unwrap();
        let data = "below 2\nbelow 3\nbelow 3\nabove 10\nalso 15\n";
        assert!(symspell
            .load_dictionary_stream(Cursor::new(data), 0, 1, None)
            .unwrap());
        assert_eq!(2, symspell.word_count());
        assert_eq!(1, symspell.below_threshold_word_count());
        assert_eq!(Some(8), symspell.below_threshold_frequency("below"));

        symspell.create_dictionary_entry("below", 4);
        assert_eq!(Some(12), symspell.word_frequency("below"));
        assert_eq!(0, symspell.below_threshold_word_count());
    }

    #[test]
    fn bigram_loads_pair_adjacent_tokens() {
        let mut symspell = SymSpell::new(2, 7, 1).unwrap();
        let data = "abcs of 10956800\naaron and 10721728\nthe 23135851162\n";
        assert!(symspell
            .load_bigram_dictionary_stream(Cursor::new(data), 0, 2, None)
            .unwrap());
        assert_eq!(2, symspell.bigram_count());
        assert_eq!(Some(10_956_800), symspell.bigram_frequency("abcs of"));
        assert_eq!(Some(10_721_728), symspell.bigram_frequency("aaron and"));
        assert_eq!(None, symspell.bigram_frequency("the"));
    }

    #[test]
    fn bigram_loads_support_custom_separators() {
        let mut symspell = SymSpell::new(2, 7, 1).unwrap();
        let data = "abcs of$10956800\naaron and$10721728\n";
        assert!(symspell
            .load_bigram_dictionary_stream(Cursor::new(data), 0, 1, Some("$"))
            .unwrap());
        assert_eq!(2, symspell.bigram_count());
        assert_eq!(Some(10_956_800), symspell.bigram_frequency("abcs of"));
    }

    #[test]
    fn corpus_dictionaries_count_letter_runs() {
        let mut symspell = SymSpell::new(2, 7, 1).unwrap();
        let text = "The quick! brown_fox 123 jumps\nthe the the\n";
        assert!(symspell.create_dictionary_stream(Cursor::new(text)).unwrap());
        assert_eq!(5, symspell.word_count());
        assert_eq!(Some(4), symspell.word_frequency("the"));
        assert_eq!(Some(1), symspell.word_frequency("brown"));
        assert_eq!(Some(1), symspell.word_frequency("fox"));
        assert_eq!(None, symspell.word_frequency("123"));
    }

    #[test]
    fn state_round_trips_through_a_snapshot() {
        let mut original = engine_with(&[("members", 226_656_153), ("member", 100)]);
        original
            .load_bigram_dictionary_stream(Cursor::new("members only 42\n"), 0, 2, None)
            .unwrap();

        let mut buffer = Vec::new();
        original.save_state(&mut buffer).unwrap();

        // different settings on the target engine are overwritten by the
        // snapshot
        let mut restored = SymSpell::new(1, 5, 1).unwrap();
        restored.load_state(buffer.as_slice()).unwrap();

        assert_eq!(original.word_count(), restored.word_count());
        assert_eq!(original.max_length(), restored.max_length());
        assert_eq!(Some(42), restored.bigram_frequency("members only"));
        for input in ["memebers", "member", "mmbers"] {
            assert_eq!(
                original
                    .lookup(input, Verbosity::Closest, 2, false, None, false)
                    .unwrap(),
                restored
                    .lookup(input, Verbosity::Closest, 2, false, None, false)
                    .unwrap(),
                "{input}"
            );
        }
    }

    #[test]
    fn state_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.bin");

        let original = engine_with(&[("members", 226_656_153)]);
        original.save_state_to_path(&path).unwrap();

        let mut restored = SymSpell::new(2, 7, 1).unwrap();
        restored.load_state_from_path(&path).unwrap();
        let results = restored
            .lookup("memebers", Verbosity::Closest, 2, false, None, false)
            .unwrap();
        assert_eq!(vec![Suggestion::new("members", 1, 226_656_153)], results);
    }

    #[test]
    fn state_version_mismatch_fails_the_load() {
        let stale = SymSpellState {
            data_version: DATA_VERSION - 1,
            max_dictionary_edit_distance: 2,
            prefix_length: 7,
            count_threshold: 1,
            max_length: 0,
            bigram_count_min: u64::MAX,
            words: HashMap::new(),
            below_threshold_words: HashMap::new(),
            bigrams: HashMap::new(),
        };
        let bytes = bincode::serialize(&stale).unwrap();

        let mut symspell = SymSpell::new(2, 7, 1).unwrap();
        assert!(matches!(
            symspell.load_state(bytes.as_slice()),
            Err(Error::DataVersionMismatch {
                expected: DATA_VERSION,
                found: 2
            })
        ));
    }
}
