//! Ingestion pipeline orchestrator
//!
//! Drives the whole run: builds the run-local category map once, then
//! for each category upserts its row and walks the page budget,
//! fetching, tagging, and persisting each page of objects in turn.
//! Entities never outlive the page they were fetched on.

use std::collections::HashMap;

use tracing::info;

use super::client::CollectionsClient;
use super::models::MuseumObject;
use super::storage::CollectionsStore;
use super::Result;
use crate::config::IngestConfig;

/// Aggregate statistics for one ingestion run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub categories: usize,
    pub pages_fetched: usize,
    pub objects_loaded: usize,
}

/// Orchestrator for a full ingestion run.
pub struct CollectionsPipeline {
    client: CollectionsClient,
    store: CollectionsStore,
    categories: Vec<String>,
    object_count: u32,
    page_size: u32,
}

impl CollectionsPipeline {
    pub fn new(client: CollectionsClient, store: CollectionsStore, config: &IngestConfig) -> Self {
        CollectionsPipeline {
            client,
            store,
            categories: config.categories.clone(),
            object_count: config.object_count,
            page_size: config.page_size,
        }
    }

    /// Run the ingestion to completion.
    ///
    /// The configured object count is a target budget partitioned evenly
    /// across categories; the last page of a category may come back
    /// short if upstream has fewer objects than requested.
    pub async fn run(&self) -> Result<RunStats> {
        let category_map = category_map(&self.categories);
        let pages = pages_per_category(
            self.object_count,
            self.categories.len() as u32,
            self.page_size,
        );

        let mut stats = RunStats {
            categories: category_map.len(),
            ..RunStats::default()
        };

        for (category_id, category) in &category_map {
            self.store.insert_category(*category_id, category).await?;
            info!(category_id, category, "inserted category");

            for page in 0..pages {
                let mut objects = self
                    .client
                    .fetch_objects(category, page, self.page_size)
                    .await?;
                stats.pages_fetched += 1;

                tag_page(&mut objects, *category_id);
                for object in objects.values() {
                    self.store.insert_object(object).await?;
                    stats.objects_loaded += 1;
                }
            }
        }

        info!(total = stats.objects_loaded, "total objects");

        Ok(stats)
    }
}

/// Build the immutable run-local category map: each configured name is
/// assigned an integer id from its list position. This id depends on the
/// run configuration; it is not a stable upstream identifier.
pub fn category_map(names: &[String]) -> Vec<(i16, String)> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| (index as i16, name.clone()))
        .collect()
}

/// Tag every object on a fetched page with the run-local id of the
/// category it was searched under. Search results carry no category of
/// their own; the id comes entirely from the request.
pub fn tag_page(objects: &mut HashMap<String, MuseumObject>, category_id: i16) {
    for object in objects.values_mut() {
        object.category = Some(category_id);
    }
}

/// Number of pages to request per category: the total budget is split
/// evenly across categories and then into page-sized chunks, with
/// integer division at both steps.
pub fn pages_per_category(total: u32, categories: u32, page_size: u32) -> u32 {
    if categories == 0 || page_size == 0 {
        return 0;
    }
    (total / categories) / page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_ids_follow_list_position() {
        let names = vec!["A".to_string(), "B".to_string()];
        let map = category_map(&names);
        assert_eq!(map, vec![(0, "A".to_string()), (1, "B".to_string())]);
    }

    #[test]
    fn tag_page_stamps_every_object_with_the_category_id() {
        let mut objects: HashMap<String, MuseumObject> = ["co1", "co2"]
            .iter()
            .map(|id| (id.to_string(), MuseumObject::new(id.to_string())))
            .collect();

        tag_page(&mut objects, 4);

        assert!(objects.values().all(|o| o.category == Some(4)));
    }

    #[test]
    fn two_categories_and_200_objects_yield_one_page_each() {
        assert_eq!(pages_per_category(200, 2, 100), 1);
    }

    #[test]
    fn default_budget_yields_ten_pages_per_category() {
        assert_eq!(pages_per_category(6000, 6, 100), 10);
    }

    #[test]
    fn budget_below_one_page_yields_no_pages() {
        assert_eq!(pages_per_category(150, 2, 100), 0);
    }

    #[test]
    fn zero_categories_yield_no_pages() {
        assert_eq!(pages_per_category(6000, 0, 100), 0);
    }
}
