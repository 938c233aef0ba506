use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{error, info};

use crate::filter::{self, Criteria};
use crate::geo::{self, GeoStats, ALL_CITIES};
use crate::models::FarmerRecord;
use crate::normalize::{self, RawDocument};
use crate::paging::{self, Page, PageWindow};

/// Anything that can hand over the full set of stored farmer documents.
pub trait DocumentSource {
    fn fetch_documents(&self) -> anyhow::Result<Vec<RawDocument>>;
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not load registry: {0}")]
    Source(String),
}

/// Everything the list and chart views depend on. A new value is built for
/// every change; views are recomputed from it, never patched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub criteria: Criteria,
    pub page: i64,
    pub selected_city: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            criteria: Criteria::default(),
            page: 1,
            selected_city: ALL_CITIES.to_string(),
        }
    }
}

impl ViewState {
    pub fn with_criteria(&self, criteria: Criteria) -> Self {
        Self {
            criteria,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_page(&self, page: i64) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn with_city(&self, city: &str) -> Self {
        Self {
            selected_city: city.to_string(),
            ..self.clone()
        }
    }
}

pub struct RegistryView<'a> {
    pub total_matches: usize,
    pub page: Page<&'a FarmerRecord>,
    pub window: PageWindow,
}

/// The last successfully loaded snapshot of the registry.
#[derive(Default)]
pub struct Registry {
    records: Vec<FarmerRecord>,
    loaded_at: Option<DateTime<Local>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_documents(docs: &[RawDocument]) -> Self {
        let mut registry = Self::new();
        registry.replace(docs);
        registry
    }

    /// Fetches and normalizes a fresh snapshot. On failure the previous
    /// snapshot stays in place.
    pub fn reload(&mut self, source: &dyn DocumentSource) -> Result<usize, LoadError> {
        let docs = source.fetch_documents().map_err(|e| {
            error!(error = %e, "registry load failed");
            LoadError::Source(format!("{:#}", e))
        })?;
        self.replace(&docs);
        info!(records = self.records.len(), "registry loaded");
        Ok(self.records.len())
    }

    fn replace(&mut self, docs: &[RawDocument]) {
        let mut records = normalize::normalize_all(docs);
        // Newest first; undated records sink to the end
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.records = records;
        self.loaded_at = Some(Local::now());
    }

    pub fn records(&self) -> &[FarmerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Local>> {
        self.loaded_at
    }

    pub fn get(&self, id: &str) -> Option<&FarmerRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn filtered(&self, criteria: &Criteria) -> Vec<&FarmerRecord> {
        filter::filter(&self.records, criteria)
    }

    pub fn view(&self, state: &ViewState, page_size: usize) -> RegistryView<'_> {
        let matches = self.filtered(&state.criteria);
        let page = paging::paginate(&matches, page_size, state.page);
        let window = PageWindow::new(page.page, page.total_pages);
        RegistryView {
            total_matches: matches.len(),
            page,
            window,
        }
    }

    /// Region chart for the records passing the current criteria.
    pub fn stats(&self, state: &ViewState) -> GeoStats {
        geo::aggregate(self.filtered(&state.criteria), &state.selected_city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;
    use std::cell::Cell;

    struct FakeSource {
        docs: Vec<RawDocument>,
        fail: Cell<bool>,
    }

    impl DocumentSource for FakeSource {
        fn fetch_documents(&self) -> anyhow::Result<Vec<RawDocument>> {
            if self.fail.get() {
                return Err(anyhow!("connection refused"));
            }
            Ok(self.docs.clone())
        }
    }

    fn docs(n: usize) -> Vec<RawDocument> {
        (0..n)
            .map(|i| {
                RawDocument::new(
                    format!("f{}", i),
                    json!({
                        "name": format!("농부{}", i),
                        "jibunAddress": if i % 2 == 0 {
                            "전라남도 영암군 영암읍 회문리 1"
                        } else {
                            "전라남도 나주시 남평읍 광촌리 2"
                        },
                        "createdAt": format!("2024-01-01 00:00:{:02}", i),
                    }),
                )
            })
            .collect()
    }

    #[test]
    fn test_reload_sorts_newest_first() {
        let source = FakeSource {
            docs: docs(3),
            fail: Cell::new(false),
        };
        let mut registry = Registry::new();
        assert_eq!(registry.reload(&source).unwrap(), 3);
        let ids: Vec<&str> = registry.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["f2", "f1", "f0"]);
        assert!(registry.loaded_at().is_some());
    }

    #[test]
    fn test_failed_reload_keeps_last_snapshot() {
        let source = FakeSource {
            docs: docs(2),
            fail: Cell::new(false),
        };
        let mut registry = Registry::new();
        registry.reload(&source).unwrap();

        source.fail.set(true);
        let err = registry.reload(&source).unwrap_err();
        assert!(err.to_string().starts_with("could not load registry"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_failed_first_load_stays_empty() {
        let source = FakeSource {
            docs: docs(2),
            fail: Cell::new(true),
        };
        let mut registry = Registry::new();
        assert!(registry.reload(&source).is_err());
        assert!(registry.is_empty());
        assert!(registry.loaded_at().is_none());
    }

    #[test]
    fn test_view_clamps_stale_page() {
        let registry = Registry::from_documents(&docs(17));
        let state = ViewState::default().with_page(3);
        let view = registry.view(&state, 15);
        assert_eq!(view.total_matches, 17);
        assert_eq!(view.page.page, 2);
        assert_eq!(view.page.total_pages, 2);
        assert_eq!(view.page.items.len(), 2);
        // Oldest two records are last
        assert_eq!(view.page.items[1].id, "f0");
        assert_eq!(view.window.pages(), 1..=2);
    }

    #[test]
    fn test_new_criteria_resets_page() {
        let state = ViewState::default().with_page(4);
        let next = state.with_criteria(Criteria {
            search_term: "농부1".into(),
            ..Default::default()
        });
        assert_eq!(next.page, 1);
        assert_eq!(state.page, 4);
    }

    #[test]
    fn test_stats_follow_criteria() {
        let registry = Registry::from_documents(&docs(5));
        let state = ViewState::default();
        let stats = registry.stats(&state);
        assert_eq!(stats.labels[0], "영암군");
        assert_eq!(stats.customers[0], 3);

        let state = state.with_criteria(Criteria {
            city: "나주시".into(),
            ..Default::default()
        });
        let stats = registry.stats(&state.with_city("나주시"));
        assert_eq!(stats.labels, vec!["남평읍"]);
        assert_eq!(stats.customers, vec![2]);
    }
}
