//! Property tests for base-relative entry paths.

use std::path::{Path, PathBuf};

use proptest::prelude::*;
use zipmend_path::{Error, absolutize, relative_to};

fn root() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:\\")
    } else {
        PathBuf::from("/")
    }
}

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-][a-zA-Z0-9_.-]{0,8}".prop_filter("no dot-only segments", |s| {
        s.chars().any(|c| c != '.')
    })
}

fn segments(range: std::ops::Range<usize>) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), range)
}

fn join_all(base: &Path, parts: &[String]) -> PathBuf {
    parts.iter().fold(base.to_path_buf(), |acc, part| acc.join(part))
}

proptest! {
    #[test]
    fn nested_paths_round_trip(base_parts in segments(0..4), rest in segments(1..5)) {
        let base = join_all(&root(), &base_parts);
        let full = join_all(&base, &rest);

        let relative = relative_to(&base, &full).unwrap();
        let text = relative.as_str();

        prop_assert!(!text.starts_with('/'));
        prop_assert!(!text.contains('\\'));
        prop_assert_eq!(text, rest.join("/"));
        prop_assert_eq!(
            absolutize(base.join(text)).unwrap(),
            absolutize(&full).unwrap()
        );
    }

    #[test]
    fn paths_outside_base_are_rejected(
        shared in segments(0..3),
        left in segment(),
        right in segment(),
        rest in segments(0..3),
    ) {
        prop_assume!(left.to_lowercase() != right.to_lowercase());
        let prefix = join_all(&root(), &shared);
        let base = prefix.join(&left);
        let full = join_all(&prefix.join(&right), &rest);

        let result = relative_to(&base, &full);
        let rejected = matches!(result, Err(Error::Containment { .. }));
        prop_assert!(rejected, "expected Containment, got {:?}", result);
    }

    #[test]
    fn parent_escapes_are_rejected(base_parts in segments(1..4), ups in 1usize..4, tail in segment()) {
        let base = join_all(&root(), &base_parts);
        let mut escaped = base.clone();
        for _ in 0..ups {
            escaped.push("..");
        }
        escaped.push(&tail);

        // An escape that lands back inside the base by name is still a legal nesting.
        let landed = absolutize(&escaped).unwrap();
        prop_assume!(!landed.starts_with(&base) || landed == base);

        let result = relative_to(&base, &escaped);
        let rejected = matches!(result, Err(Error::Containment { .. }));
        prop_assert!(rejected, "expected Containment, got {:?}", result);
    }
}
