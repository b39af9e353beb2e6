// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `mapper.rs`

#[cfg(test)]
mod tests {
    use crate::mapper::{TtlPolicy, TypeMapper};
    use crate::record::RecordType;
    use crate::transfer::SourceRecord;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn sample_records() -> Vec<SourceRecord> {
        vec![
            SourceRecord::A {
                name: "host.example.com.".into(),
                ttl: 3600,
                address: Ipv4Addr::new(10, 11, 100, 30),
            },
            SourceRecord::Aaaa {
                name: "host.example.com.".into(),
                ttl: 3600,
                address: Ipv6Addr::LOCALHOST,
            },
            SourceRecord::Cname {
                name: "www.example.com.".into(),
                ttl: 3600,
                target: "host.example.com.".into(),
            },
            SourceRecord::Mx {
                name: "example.com.".into(),
                ttl: 3600,
                preference: 10,
                exchange: "mail.example.com.".into(),
            },
            SourceRecord::Txt {
                name: "example.com.".into(),
                ttl: 3600,
                segments: vec!["v=spf1".into(), "-all".into()],
            },
        ]
    }

    fn unrecognized(record_type: &str) -> SourceRecord {
        SourceRecord::Unrecognized {
            name: "example.com.".into(),
            ttl: 3600,
            record_type: record_type.into(),
        }
    }

    #[test]
    fn test_supported_types_always_map() {
        let mapper = TypeMapper::default();

        for source in sample_records() {
            let record = mapper
                .map(&source)
                .unwrap_or_else(|| panic!("{source:?} should map"));
            assert_eq!(record.name(), source.name());
            assert_eq!(record.values().len(), 1);
        }
    }

    #[test]
    fn test_unsupported_types_map_to_nothing() {
        let mapper = TypeMapper::default();

        for record_type in ["SOA", "NS", "SRV", "PTR", "CAA"] {
            assert!(mapper.map(&unrecognized(record_type)).is_none());
        }
    }

    #[test]
    fn test_txt_segments_are_joined_and_quoted() {
        let mapper = TypeMapper::default();
        let source = SourceRecord::Txt {
            name: "example.com.".into(),
            ttl: 60,
            segments: vec!["foo".into(), "bar".into()],
        };

        let record = mapper.map(&source).unwrap();

        assert_eq!(record.record_type(), RecordType::Txt);
        assert_eq!(record.values(), ["\"foo bar\""]);
    }

    #[test]
    fn test_mx_drops_preference() {
        let mapper = TypeMapper::default();
        let record = mapper.map(&sample_records()[3]).unwrap();

        assert_eq!(record.values(), ["mail.example.com."]);
    }

    #[test]
    fn test_fixed_ttl_policy_ignores_source_ttl() {
        let mapper = TypeMapper::default();
        let record = mapper.map(&sample_records()[0]).unwrap();
        assert_eq!(record.ttl(), 60);

        let mapper = TypeMapper::new(RecordType::ALL, TtlPolicy::Fixed, 300);
        let record = mapper.map(&sample_records()[0]).unwrap();
        assert_eq!(record.ttl(), 300);
    }

    #[test]
    fn test_source_ttl_policy_uses_header_ttl() {
        let mapper = TypeMapper::new(RecordType::ALL, TtlPolicy::Source, 60);
        let record = mapper.map(&sample_records()[0]).unwrap();
        assert_eq!(record.ttl(), 3600);
    }

    #[test]
    fn test_record_type_filter() {
        let mapper = TypeMapper::new([RecordType::A, RecordType::Cname], TtlPolicy::Fixed, 60);

        assert!(mapper.supports(RecordType::A));
        assert!(!mapper.supports(RecordType::Txt));
        assert!(mapper.map(&sample_records()[4]).is_none());
        assert!(mapper.map(&sample_records()[2]).is_some());
    }

    #[test]
    fn test_map_all_preserves_order_and_counts_skips() {
        let mapper = TypeMapper::default();
        let mut sources = vec![unrecognized("SOA")];
        sources.extend(sample_records());
        sources.push(unrecognized("SOA"));

        let mapped = mapper.map_all(&sources);

        assert_eq!(mapped.skipped, 2);
        let types: Vec<_> = mapped.records.iter().map(|r| r.record_type()).collect();
        assert_eq!(
            types,
            vec![
                RecordType::A,
                RecordType::Aaaa,
                RecordType::Cname,
                RecordType::Mx,
                RecordType::Txt
            ]
        );
    }

    #[test]
    fn test_ttl_policy_serde() {
        let policy: TtlPolicy = serde_yaml::from_str("source").unwrap();
        assert_eq!(policy, TtlPolicy::Source);
        assert_eq!(TtlPolicy::default(), TtlPolicy::Fixed);
    }
}
