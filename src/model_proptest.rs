//! Property-based tests for parsing, editing, and rendering.
//!
//! These tests use proptest to generate random section contents and verify
//! that the model invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::model::ConfigModel;
    use crate::operators::{insert, patch, upsert, FilterMode, MergeStrategies, Position};
    use crate::parser::parse_into;
    use crate::writer::render;
    use proptest::prelude::*;

    /// Lines that never look like section markers
    fn line() -> impl Strategy<Value = String> {
        "[a-z0-9=,. ]{0,20}".prop_map(|s| s.trim().to_string())
    }

    fn sections() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
        prop::collection::vec(("[a-z_]{1,10}", prop::collection::vec(line(), 0..6)), 0..5)
    }

    fn to_text(sections: &[(String, Vec<String>)]) -> String {
        let mut text = String::new();
        for (name, lines) in sections {
            text.push_str(&format!("[{name}]\n"));
            for line in lines {
                text.push_str(line);
                text.push('\n');
            }
        }
        text
    }

    // ============================================================================
    // parse / render property tests
    // ============================================================================

    proptest! {
        /// Property: parse then render preserves every non-blank line in order
        #[test]
        fn render_preserves_non_blank_lines(sections in sections()) {
            let mut model = ConfigModel::new();
            parse_into(&mut model, &to_text(&sections));
            let mut reparsed = ConfigModel::new();
            parse_into(&mut reparsed, &render(&model));

            let names: Vec<_> = model.section_names().collect();
            let reparsed_names: Vec<_> = reparsed.section_names().collect();
            prop_assert_eq!(names, reparsed_names);

            for section in model.sections() {
                let expected: Vec<_> = section.lines().iter().filter(|l| !l.is_empty()).collect();
                let actual = reparsed.lines(section.name());
                prop_assert!(actual.is_some(), "section [{}] dropped", section.name());
                let actual: Vec<_> = actual
                    .unwrap_or_default()
                    .iter()
                    .filter(|l| !l.is_empty())
                    .collect();
                prop_assert_eq!(expected, actual);
            }
        }

        /// Property: rendering is a pure function of the model
        #[test]
        fn render_is_deterministic(sections in sections()) {
            let mut model = ConfigModel::with_skeleton();
            parse_into(&mut model, &to_text(&sections));
            prop_assert_eq!(render(&model), render(&model.clone()));
        }
    }

    // ============================================================================
    // edit operator property tests
    // ============================================================================

    proptest! {
        /// Property: exclude then retain with the same keywords empties the section
        #[test]
        fn exclude_then_retain_is_empty(
            lines in prop::collection::vec(line(), 0..10),
            keywords in prop::collection::vec("[a-z]{1,3}", 1..4),
        ) {
            let mut model = ConfigModel::new();
            model.section_mut_or_create("filter_local");
            for line in &lines {
                model.push_line("filter_local", line.clone());
            }
            patch::apply(&mut model, "filter_local", &keywords, FilterMode::Exclude);
            patch::apply(&mut model, "filter_local", &keywords, FilterMode::Retain);
            prop_assert!(model.section("filter_local").unwrap().is_empty());
        }

        /// Property: inserted lines are never duplicated
        #[test]
        fn insert_never_duplicates(
            calls in prop::collection::vec((line(), any::<bool>()), 0..20),
        ) {
            let mut model = ConfigModel::new();
            for (line, front) in &calls {
                let position = if *front { Position::Front } else { Position::Back };
                insert::apply(&mut model, "filter_local", line, position);
            }
            let lines = model.lines("filter_local").unwrap_or_default();
            let mut unique = lines.to_vec();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), lines.len());
        }

        /// Property: front insertions of distinct lines come out reversed
        #[test]
        fn front_insertions_reverse(lines in prop::collection::hash_set("[a-z]{1,8}", 0..8)) {
            let lines: Vec<String> = lines.into_iter().collect();
            let mut model = ConfigModel::new();
            for line in &lines {
                insert::apply(&mut model, "filter_local", line, Position::Front);
            }
            let mut expected = lines.clone();
            expected.reverse();
            prop_assert_eq!(model.lines("filter_local").unwrap_or_default(), &expected[..]);
        }

        /// Property: after any upsert sequence each key has exactly one line
        #[test]
        fn upsert_keeps_one_line_per_key(
            ops in prop::collection::vec(("(port|host|name)", "[a-z0-9]{1,5}"), 1..15),
        ) {
            let mut model = ConfigModel::new();
            let strategies = MergeStrategies::default();
            for (key, value) in &ops {
                upsert::apply(&mut model, "general", key, value, &strategies);
            }
            let lines = model.lines("general").unwrap();
            for (key, _) in &ops {
                let count = lines.iter().filter(|l| upsert::line_has_key(l, key)).count();
                prop_assert_eq!(count, 1);
            }
            let (last_key, last_value) = ops.last().unwrap();
            let expected = format!("{last_key}={last_value}");
            prop_assert!(lines.contains(&expected));
        }
    }
}
