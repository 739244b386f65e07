//
//  kibana-api
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for Kibana API Responses
//!
//! Kibana list endpoints are page-number based. The client never iterates
//! pages itself: `page` and `per_page` are passed through verbatim and the
//! caller decides whether to request the next page.
//!
//! # Response Shapes
//!
//! | API | Items key | Page size key |
//! |-----|-----------|---------------|
//! | Alerting rules | `data` | `per_page` |
//! | Detection engine | `data` | `perPage` |
//! | Saved objects | `saved_objects` | `per_page` |
//! | Fleet | `items` | `perPage` |
//!
//! [`Page`] accepts all of them.
//!
//! # Example
//!
//! ```rust
//! use kibana_api::api::common::Page;
//!
//! let json = r#"{"items": [1, 2], "page": 1, "perPage": 2, "total": 5}"#;
//! let page: Page<u32> = serde_json::from_str(json).unwrap();
//! assert_eq!(page.items, vec![1, 2]);
//! assert!(page.has_next());
//! assert_eq!(page.next_page(), Some(2));
//! ```

use serde::{Deserialize, Serialize};

/// One page of results from a Kibana list endpoint.
///
/// # Type Parameters
///
/// - `T` - The type of items on the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page. May be empty.
    #[serde(alias = "data", alias = "saved_objects", default = "Vec::new")]
    pub items: Vec<T>,

    /// Current page number (1-indexed).
    #[serde(default)]
    pub page: u32,

    /// Number of items requested per page.
    #[serde(alias = "perPage", default)]
    pub per_page: u32,

    /// Total number of matching items across all pages.
    #[serde(default)]
    pub total: u64,
}

impl<T> Page<T> {
    /// Returns `true` when items exist beyond this page.
    pub fn has_next(&self) -> bool {
        u64::from(self.page) * u64::from(self.per_page) < self.total
    }

    /// The page number to request next, if there is one.
    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.page + 1)
    }
}

/// Page selection passed through to list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    /// Page number (1-indexed). Kibana defaults to 1.
    pub page: Option<u32>,

    /// Items per page. Kibana's default depends on the endpoint.
    pub per_page: Option<u32>,
}

impl PageParams {
    /// Selects page `page` with `per_page` items.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}
