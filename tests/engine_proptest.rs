//! Property-based tests for the rewrite engine's fixed points
//!
//! The repair pass and the concatenation folder both claim convergence;
//! these tests hammer that claim with arbitrary noisy input. None of the
//! engine's leaf passes may panic, whatever the source looks like.

use proptest::prelude::*;
use unmangle::concat::fold_line;
use unmangle::scope::ScopeStack;
use unmangle::strip::strip_block_comments;
use unmangle::values::{repair_elements, split_elements};

proptest! {
    #[test]
    fn repair_is_idempotent(fragments in proptest::collection::vec("[a-z\"()+, ]{0,12}", 0..10)) {
        let once = repair_elements(fragments.clone());
        let twice = repair_elements(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn repair_drops_all_empty_candidates(fragments in proptest::collection::vec("[a-z\"]{0,6}", 0..10)) {
        let repaired = repair_elements(fragments);
        prop_assert!(repaired.iter().all(|v| !v.is_empty()));
    }

    #[test]
    fn split_then_repair_never_panics(body in "[a-z\"(), +;]{0,40}") {
        let _ = repair_elements(split_elements(&body));
    }

    #[test]
    fn fold_reaches_a_fixed_point(line in "[a-z\"+() ;=]{0,40}") {
        let once = fold_line(&line);
        prop_assert_eq!(fold_line(&once), once.clone());
    }

    #[test]
    fn balanced_braces_restore_depth(depth in 1usize..8) {
        let mut scope = ScopeStack::new();
        for _ in 0..depth {
            scope.track("{");
        }
        prop_assert_eq!(scope.depth(), depth as i32);
        for _ in 0..depth {
            scope.track("}");
        }
        prop_assert_eq!(scope.depth(), 0);
    }

    #[test]
    fn depth_never_negative_under_default_policy(lines in proptest::collection::vec("[{}x]{0,3}", 0..30)) {
        let mut scope = ScopeStack::new();
        for line in &lines {
            scope.track(line);
            prop_assert!(scope.depth() >= 0);
        }
    }

    #[test]
    fn strip_never_grows_the_input(source in "[a-z/*\n ]{0,80}") {
        let lines: Vec<&str> = source.lines().collect();
        let stripped = strip_block_comments(&lines);
        prop_assert!(stripped.len() <= lines.len());
    }

    #[test]
    fn strip_passes_marker_free_sources_through(source in "[a-z \n]{0,60}") {
        let lines: Vec<String> = source.lines().map(str::to_string).collect();
        let stripped = strip_block_comments(&lines);
        prop_assert_eq!(stripped, lines);
    }
}
