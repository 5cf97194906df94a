//! Property tests for relative paths and exclusion matching.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use changelogger::{relative_path, Exclusions};

fn segments() -> impl Strategy<Value = Vec<String>> {
    let segment = proptest::string::string_regex("[A-Za-z0-9_-]{1,12}(\\.[a-z]{1,4})?").unwrap();
    proptest::collection::vec(segment, 1..=5)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Relative path computation never panics and always yields a `/`-rooted form.
    #[test]
    fn property_relative_path_is_slash_rooted(
        root in "(?s).{0,64}",
        path in "(?s).{0,128}",
    ) {
        let relative = relative_path(Path::new(&root), Path::new(&path));
        prop_assert!(relative.starts_with('/'));
        prop_assert!(!relative.contains('\\'));
    }

    /// PROPERTY: A path below the root maps to its segments joined by `/`.
    #[test]
    fn property_relative_path_under_root(
        parts in segments()
    ) {
        let root = PathBuf::from("/srv/repository");
        let mut path = root.clone();
        for part in &parts {
            path.push(part);
        }

        prop_assert_eq!(relative_path(&root, &path), format!("/{}", parts.join("/")));
    }

    /// PROPERTY: Exclusion checks never panic on arbitrary patterns and paths.
    #[test]
    fn property_is_excluded_never_panics(
        field in "(?s).{0,64}",
        path in "(?s).{0,128}",
    ) {
        let exclusions = Exclusions::from_field(&field);
        let _ = exclusions.is_excluded(Path::new("/srv/repository"), Path::new(&path));
    }

    /// PROPERTY: An empty exclusion list excludes nothing.
    #[test]
    fn property_empty_exclusions_exclude_nothing(
        parts in segments()
    ) {
        let root = PathBuf::from("/srv/repository");
        let path = parts.iter().fold(root.clone(), |p, s| p.join(s));
        prop_assert!(!Exclusions::default().is_excluded(&root, &path));
    }

    /// PROPERTY: A prefix rule excludes everything below that folder.
    #[test]
    fn property_prefix_rule_excludes_subtree(
        parts in segments()
    ) {
        let root = PathBuf::from("/srv/repository");
        let path = parts.iter().fold(root.join("build"), |p, s| p.join(s));
        prop_assert!(Exclusions::from_field("/build").is_excluded(&root, &path));
    }
}
