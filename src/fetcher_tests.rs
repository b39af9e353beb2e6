// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `fetcher.rs`

#[cfg(test)]
mod tests {
    use crate::errors::FetchError;
    use crate::fetcher::fetch_destination_state;
    use crate::provider::RecordSetPage;
    use crate::testing::{cursor, record_set, FakeProvider};

    #[tokio::test]
    async fn test_single_page_makes_one_call() {
        let provider = FakeProvider::with_record_sets(vec![
            record_set("www.example.com.", "A", &["10.0.0.1"]),
            record_set("example.com.", "NS", &["ns1.example.net."]),
        ]);

        let state = fetch_destination_state(&provider, "Z123", 1000)
            .await
            .unwrap();

        assert_eq!(provider.list_calls(), vec![None]);
        assert_eq!(state.len(), 2);
        assert!(state.contains_key("www.example.com.:A"));
        assert!(state.contains_key("example.com.:NS"));
    }

    #[tokio::test]
    async fn test_truncated_page_is_followed_by_cursor() {
        let next = cursor("mail.example.com.", "MX");
        let provider = FakeProvider::with_pages(vec![
            RecordSetPage {
                record_sets: vec![record_set("www.example.com.", "A", &["10.0.0.1"])],
                next: Some(next.clone()),
                truncated: true,
            },
            RecordSetPage {
                record_sets: vec![record_set("mail.example.com.", "MX", &["mx.example.com."])],
                next: None,
                truncated: false,
            },
        ]);

        let state = fetch_destination_state(&provider, "Z123", 1)
            .await
            .unwrap();

        assert_eq!(provider.list_calls(), vec![None, Some(next)]);
        assert_eq!(state.len(), 2);
        assert_eq!(
            state["mail.example.com.:MX"].values,
            vec!["mx.example.com.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_many_pages_are_fetched_iteratively() {
        let pages: Vec<RecordSetPage> = (0..50)
            .map(|i| RecordSetPage {
                record_sets: vec![record_set(&format!("h{i}.example.com."), "A", &["10.0.0.1"])],
                next: (i < 49).then(|| cursor(&format!("h{}.example.com.", i + 1), "A")),
                truncated: i < 49,
            })
            .collect();
        let provider = FakeProvider::with_pages(pages);

        let state = fetch_destination_state(&provider, "Z123", 1)
            .await
            .unwrap();

        assert_eq!(provider.list_calls().len(), 50);
        assert_eq!(state.len(), 50);
    }

    #[tokio::test]
    async fn test_list_failure_is_fatal() {
        let provider = FakeProvider::with_pages(vec![
            RecordSetPage {
                record_sets: vec![record_set("www.example.com.", "A", &["10.0.0.1"])],
                next: Some(cursor("z.example.com.", "A")),
                truncated: true,
            },
            RecordSetPage::default(),
        ])
        .failing_list_on_page(2);

        let err = fetch_destination_state(&provider, "Z123", 1)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::ListFailed { page: 2, .. }));
    }

    #[tokio::test]
    async fn test_truncated_page_without_cursor() {
        let provider = FakeProvider::with_pages(vec![RecordSetPage {
            record_sets: vec![],
            next: None,
            truncated: true,
        }]);

        let err = fetch_destination_state(&provider, "Z123", 100)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::MissingCursor { page: 1, .. }));
        assert_eq!(provider.list_calls().len(), 1);
    }
}
