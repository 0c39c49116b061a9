use super::{ConventionRules, NamingConvention, MAX_NAME_LENGTH};

fn rules(convention: NamingConvention, min: usize, max: usize) -> ConventionRules {
    ConventionRules::new(convention, min, max).unwrap()
}

#[test]
fn test_parse_convention_names() {
    for convention in NamingConvention::ALL {
        let parsed: NamingConvention = convention.as_str().parse().unwrap();
        assert_eq!(parsed, convention);
    }
    assert_eq!(
        "natural-language".parse::<NamingConvention>().unwrap(),
        NamingConvention::NaturalLanguage
    );
    assert!("SCREAMING_CASE".parse::<NamingConvention>().is_err());
}

#[test]
fn test_examples_match_their_own_pattern() {
    for convention in NamingConvention::ALL {
        let r = rules(convention, 1, 15);
        assert!(
            r.accepts(convention.example()),
            "{} should accept {}",
            convention,
            convention.example()
        );
    }
}

#[test]
fn test_word_count_delimited() {
    assert_eq!(NamingConvention::SnakeCase.word_count("my_document_file"), 3);
    assert_eq!(NamingConvention::KebabCase.word_count("a-b"), 2);
    assert_eq!(NamingConvention::DotNotation.word_count("v1.release.notes"), 3);
    assert_eq!(NamingConvention::NaturalLanguage.word_count("My File"), 2);
}

#[test]
fn test_word_count_case_transitions() {
    assert_eq!(NamingConvention::CamelCase.word_count("myDocumentFile"), 3);
    assert_eq!(NamingConvention::PascalCase.word_count("MyDocumentFile"), 3);
    assert_eq!(NamingConvention::CamelCase.word_count("report2024"), 1);
    assert_eq!(NamingConvention::PascalCase.word_count(""), 0);
}

#[test]
fn test_pascal_case_rejects_spaces_even_in_word_range() {
    let r = rules(NamingConvention::PascalCase, 1, 5);
    assert!(!r.accepts("My File"));
    assert!(r.accepts("MyFile"));
}

#[test]
fn test_pattern_match_rejected_for_word_count() {
    let r = rules(NamingConvention::SnakeCase, 3, 4);
    assert!(r.matches_pattern("too_short"));
    assert!(!r.accepts("too_short"));
    assert!(r.accepts("just_right_here"));
    assert!(!r.accepts("one_two_three_four_five"));
}

#[test]
fn test_length_cap_applies_to_every_convention() {
    let long = "a".repeat(MAX_NAME_LENGTH + 1);
    for convention in NamingConvention::ALL {
        let r = rules(convention, 1, 15);
        assert!(!r.accepts(&long), "{} accepted an oversized name", convention);
    }
    let natural = rules(NamingConvention::NaturalLanguage, 1, 15);
    assert!(natural.accepts(&"a".repeat(MAX_NAME_LENGTH)));
}

#[test]
fn test_schema_bounds_repetition_by_max_words() {
    let r = rules(NamingConvention::SnakeCase, 5, 15);
    let schema = r.schema();
    let items = &schema["properties"]["suggestions"];
    assert_eq!(items["minItems"], 3);
    assert_eq!(items["maxItems"], 3);
    assert_eq!(items["items"]["pattern"], "^[a-z0-9]+(_[a-z0-9]+){0,14}$");
    assert_eq!(items["items"]["maxLength"], 128);
    assert_eq!(schema["additionalProperties"], false);
}

#[test]
fn test_invalid_word_bounds() {
    assert!(ConventionRules::new(NamingConvention::SnakeCase, 0, 5).is_err());
    assert!(ConventionRules::new(NamingConvention::SnakeCase, 6, 5).is_err());
}
