//! Integration test: categorical resolution properties

use motormart::resolver::{
    resolve, resolve_leasing, resolve_required, CategoricalVocabulary, MatchMethod,
};

fn make_vocab() -> CategoricalVocabulary {
    CategoricalVocabulary::new(
        "make",
        [
            "audi", "bmw", "honda", "mazda", "mitsubishi", "nissan", "suzuki", "toyota",
        ],
    )
}

#[test]
fn test_every_vocabulary_member_resolves_to_itself() {
    let vocab = make_vocab();
    for entry in vocab.entries() {
        let r = resolve(entry, &vocab).expect("member must resolve");
        assert_eq!(&r.entry, entry);
        assert_eq!(r.method, MatchMethod::Exact);
    }
}

#[test]
fn test_members_resolve_case_and_whitespace_insensitively() {
    let vocab = make_vocab();
    let r = resolve("  TOYOTA ", &vocab).unwrap();
    assert_eq!(r.entry, "toyota");
    assert_eq!(r.method, MatchMethod::Exact);
}

#[test]
fn test_original_casing_returned_on_match() {
    // Classifier vocabularies keep their trained casing; resolution must
    // hand back the entry exactly as the encoder was fit on it.
    let vocab = CategoricalVocabulary::new("Gear", ["Automatic", "Manual"]);
    let r = resolve("automatic", &vocab).unwrap();
    assert_eq!(r.entry, "Automatic");
}

#[test]
fn test_partial_match_either_direction() {
    let vocab = make_vocab();

    // Input contained in an entry.
    let r = resolve("mitsu", &vocab).unwrap();
    assert_eq!(r.entry, "mitsubishi");
    assert_eq!(r.method, MatchMethod::Partial);

    // Entry contained in the input.
    let r = resolve("toyota japan", &vocab).unwrap();
    assert_eq!(r.entry, "toyota");
    assert_eq!(r.method, MatchMethod::Partial);
}

#[test]
fn test_partial_match_is_order_dependent() {
    // "a" is a substring of half the entries; the first hit in stored
    // (sorted) order must win. This is exactly the short-input
    // over-matching the resolver documents and keeps.
    let vocab = make_vocab();
    let r = resolve("a", &vocab).unwrap();
    assert_eq!(r.entry, "audi");
    assert_eq!(r.method, MatchMethod::Partial);
}

#[test]
fn test_unresolvable_input_reports_sample() {
    let vocab = make_vocab();
    let err = resolve_required("zeppelin", &vocab).unwrap_err();
    let motormart::MotormartError::Resolution { field, sample, .. } = err else {
        panic!("expected resolution error");
    };
    assert_eq!(field, "make");
    assert!(!sample.is_empty());
    assert!(sample.len() <= 10);
}

#[test]
fn test_leasing_never_surfaces_not_found_on_nonempty_vocab() {
    let vocab = CategoricalVocabulary::new("leasing", ["leasing", "no leasing", "ongoing lease"]);
    for garbage in ["", "xyzzy", "perhaps", "42"] {
        let r = resolve_leasing(garbage, &vocab, Some("no leasing"))
            .expect("leasing must always resolve");
        assert!(!r.entry.is_empty());
    }
}

#[test]
fn test_leasing_empty_vocabulary_still_fails() {
    let vocab = CategoricalVocabulary::new("leasing", Vec::<String>::new());
    assert!(resolve_leasing("yes", &vocab, Some("no leasing")).is_err());
}

#[test]
fn test_alias_ladder_runs_after_partial() {
    // "yes" has an alias to "leasing", and no entry here contains "yes".
    let vocab = CategoricalVocabulary::new("leasing", ["leasing", "no leasing"]);
    let r = resolve("yes", &vocab).unwrap();
    assert_eq!(r.entry, "leasing");
    assert_eq!(r.method, MatchMethod::Alias);

    // "no" substring-matches "no leasing" before its alias is consulted.
    let r = resolve("no", &vocab).unwrap();
    assert_eq!(r.method, MatchMethod::Partial);
}
