//! Property tests for the configuration file format.

use proptest::prelude::*;

use changelogger::{generate_config, parse_config, DesiredState, Exclusions, RepositoryDefinition};

fn name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_][A-Za-z0-9_ -]{0,15}").unwrap()
}

fn pattern() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::string::string_regex("[A-Za-z0-9_-]{1,8}\\.[a-z]{1,4}").unwrap(),
        proptest::string::string_regex("\\.[a-z]{1,4}").unwrap(),
        proptest::string::string_regex("[/\\\\][a-z]{1,8}(/[a-z]{1,8}){0,2}").unwrap(),
    ]
}

fn folder() -> impl Strategy<Value = String> {
    proptest::string::string_regex("(/[A-Za-z0-9_.-]{1,10}){1,4}").unwrap()
}

fn definition() -> impl Strategy<Value = RepositoryDefinition> {
    (
        name(),
        any::<bool>(),
        proptest::collection::vec(pattern(), 0..=4),
        folder(),
    )
        .prop_map(|(name, enabled, patterns, path)| {
            RepositoryDefinition::new(
                name,
                DesiredState::from_enabled(enabled),
                Exclusions::new(patterns),
                path,
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A generated configuration parses back to the definitions it was built from.
    #[test]
    fn property_generated_config_round_trips(
        definitions in proptest::collection::vec(definition(), 0..=6)
    ) {
        let text = generate_config(&definitions);
        let parsed = parse_config(&text);

        prop_assert!(parsed.diagnostics.is_empty());
        let back: Vec<RepositoryDefinition> = parsed.definitions().cloned().collect();
        prop_assert_eq!(back, definitions);
    }

    /// PROPERTY: Parsing never panics on arbitrary input.
    #[test]
    fn property_parse_config_never_panics(
        text in "(?s).{0,512}"
    ) {
        let _ = parse_config(&text);
    }

    /// PROPERTY: Every non-comment, non-empty line yields a definition or a diagnostic.
    #[test]
    fn property_every_data_line_is_accounted_for(
        lines in proptest::collection::vec("[A-Za-z#| ]{0,24}", 0..=12)
    ) {
        let text = lines.join("\n");
        let parsed = parse_config(&text);

        let data_lines = text
            .lines()
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .count();
        prop_assert_eq!(parsed.lines.len() + parsed.diagnostics.len(), data_lines);
    }
}
