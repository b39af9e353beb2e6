// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `reconciler.rs`

#[cfg(test)]
mod tests {
    use crate::fetcher::DestinationState;
    use crate::provider::DestinationRecordSet;
    use crate::reconciler::{reconcile, ReconcileOptions};
    use crate::record::{ChangeAction, Record, RecordType};
    use crate::testing::record_set;

    fn a(name: &str, ip: &str) -> Record {
        Record::new(name, RecordType::A, vec![ip.to_string()], 60)
    }

    fn cname(name: &str, target: &str) -> Record {
        Record::new(name, RecordType::Cname, vec![target.to_string()], 60)
    }

    fn state(sets: Vec<DestinationRecordSet>) -> DestinationState {
        sets.into_iter().map(|set| (set.key(), set)).collect()
    }

    #[test]
    fn test_adjacent_duplicates_are_coalesced() {
        let records = vec![
            a("host.example.com.", "1.1.1.1"),
            a("host.example.com.", "2.2.2.2"),
            cname("other.example.com.", "x.example.com."),
        ];

        let result = reconcile(records, DestinationState::new(), ReconcileOptions::default());

        assert_eq!(result.changes.len(), 2);
        assert_eq!(result.changes[0].action, ChangeAction::Upsert);
        assert_eq!(result.changes[0].record.name(), "host.example.com.");
        assert_eq!(result.changes[0].record.values(), ["1.1.1.1", "2.2.2.2"]);
        assert_eq!(result.changes[1].record.record_type(), RecordType::Cname);
    }

    #[test]
    fn test_non_adjacent_duplicates_are_not_coalesced() {
        let records = vec![
            a("host.example.com.", "1.1.1.1"),
            cname("other.example.com.", "x.example.com."),
            a("host.example.com.", "2.2.2.2"),
        ];

        let result = reconcile(records, DestinationState::new(), ReconcileOptions::default());

        assert_eq!(result.changes.len(), 3);
        assert_eq!(result.changes[0].record.values(), ["1.1.1.1"]);
        assert_eq!(result.changes[2].record.values(), ["2.2.2.2"]);
    }

    #[test]
    fn test_same_name_different_type_is_not_coalesced() {
        let records = vec![
            a("host.example.com.", "1.1.1.1"),
            Record::new("host.example.com.", RecordType::Txt, vec!["\"hi\"".into()], 60),
        ];

        let result = reconcile(records, DestinationState::new(), ReconcileOptions::default());

        assert_eq!(result.changes.len(), 2);
    }

    #[test]
    fn test_matched_destination_records_are_still_upserted() {
        let records = vec![a("www.example.com.", "10.0.0.1")];
        let destination = state(vec![
            record_set("www.example.com.", "A", &["10.0.0.1"]),
            record_set("example.com.", "NS", &["ns1.example.net."]),
            record_set("old.example.com.", "A", &["10.9.9.9"]),
        ]);

        let result = reconcile(records, destination, ReconcileOptions::default());

        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.matched, 1);
        assert_eq!(result.unchanged, 0);
        assert_eq!(
            result.leftover,
            vec!["example.com.:NS".to_string(), "old.example.com.:A".to_string()]
        );
    }

    #[test]
    fn test_invalid_records_are_dropped() {
        let records = vec![
            a("host.example.com.", "1.1.1.1"),
            Record::new("bad.example.com.", RecordType::A, vec![], 60),
            a("host.example.com.", "2.2.2.2"),
        ];

        let result = reconcile(records, DestinationState::new(), ReconcileOptions::default());

        assert_eq!(result.invalid, 1);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].record.values(), ["1.1.1.1", "2.2.2.2"]);
    }

    #[test]
    fn test_skip_unchanged_drops_matching_records() {
        let records = vec![
            a("same.example.com.", "10.0.0.2"),
            a("same.example.com.", "10.0.0.1"),
            a("drift.example.com.", "10.0.0.3"),
            a("new.example.com.", "10.0.0.4"),
        ];
        let destination = state(vec![
            record_set("same.example.com.", "A", &["10.0.0.1", "10.0.0.2"]),
            record_set("drift.example.com.", "A", &["10.0.0.99"]),
        ]);

        let result = reconcile(
            records,
            destination,
            ReconcileOptions {
                skip_unchanged: true,
            },
        );

        let names: Vec<_> = result.changes.iter().map(|c| c.record.name()).collect();
        assert_eq!(names, vec!["drift.example.com.", "new.example.com."]);
        assert_eq!(result.unchanged, 1);
        assert_eq!(result.matched, 2);
    }

    #[test]
    fn test_skip_unchanged_compares_ttl() {
        let records = vec![Record::new(
            "www.example.com.",
            RecordType::A,
            vec!["10.0.0.1".into()],
            300,
        )];
        let destination = state(vec![record_set("www.example.com.", "A", &["10.0.0.1"])]);

        let result = reconcile(
            records,
            destination,
            ReconcileOptions {
                skip_unchanged: true,
            },
        );

        assert_eq!(result.changes.len(), 1, "TTL drift should still upsert");
    }

    #[test]
    fn test_reconcile_is_deterministic() {
        let records = vec![
            a("h.example.com.", "1.1.1.1"),
            a("h.example.com.", "2.2.2.2"),
            cname("c.example.com.", "h.example.com."),
        ];
        let destination = state(vec![record_set("h.example.com.", "A", &["1.1.1.1"])]);

        let first = reconcile(
            records.clone(),
            destination.clone(),
            ReconcileOptions::default(),
        );
        let second = reconcile(records, destination, ReconcileOptions::default());

        assert_eq!(first, second);
    }

    #[test]
    fn test_keys_match_case_insensitively_and_through_escapes() {
        let records = vec![
            a("WWW.Example.com.", "1.1.1.1"),
            a("*.example.com.", "2.2.2.2"),
        ];
        let destination = state(vec![
            record_set("www.example.com.", "A", &["1.1.1.1"]),
            record_set("\\052.example.com.", "A", &["2.2.2.2"]),
        ]);

        let result = reconcile(
            records,
            destination,
            ReconcileOptions {
                skip_unchanged: true,
            },
        );

        assert_eq!(result.matched, 2);
        assert!(result.leftover.is_empty());
        assert!(result.changes.is_empty());
        assert_eq!(result.unchanged, 2);
    }

    #[test]
    fn test_mixed_case_change_keeps_source_spelling() {
        let destination = state(vec![record_set("www.example.com.", "A", &["10.0.0.9"])]);

        let result = reconcile(
            vec![a("WWW.example.com.", "10.0.0.1")],
            destination,
            ReconcileOptions::default(),
        );

        assert_eq!(result.matched, 1);
        assert!(result.leftover.is_empty());
        assert_eq!(result.changes[0].record.name(), "WWW.example.com.");
    }
}
