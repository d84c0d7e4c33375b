//! Collections API client
//!
//! One process-scoped, connection-pooled HTTP client serves every
//! request of a run. Object pages are fetched and transformed here;
//! nested person references discovered during transformation are
//! resolved with capped concurrent fan-out across the whole page,
//! preserving reference order within each object.
//!
//! Failure semantics: network and decode failures propagate and fail
//! the page (all-or-nothing join). A record that is structurally broken,
//! directly or through one of its referenced person documents, is dumped
//! to the diagnostic directory and excluded; the rest of the page is
//! still returned.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use futures::future;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use tracing::{debug, error, info};

use super::dump::dump_record;
use super::models::{MuseumObject, Person};
use super::raw::{RawObject, RawPerson, RawPersonEnvelope, RawSearchPage};
use super::transform::{object_from_raw, person_from_raw, ObjectDraft};
use super::{CollectionsError, Result};
use crate::config::ApiConfig;

/// HTTP client for the collections online API.
pub struct CollectionsClient {
    http: Client,
    base_url: String,
    fetch_concurrency: usize,
    dump_dir: PathBuf,
}

impl CollectionsClient {
    /// Create a new client. Built once at startup and reused for every
    /// request of the run.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(CollectionsClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fetch_concurrency: config.fetch_concurrency.max(1),
            dump_dir: config.dump_dir.clone(),
        })
    }

    /// Fetch a single person document and transform it.
    ///
    /// A structurally broken document is dumped before the error is
    /// returned; network and decode failures propagate untouched.
    pub async fn fetch_person(&self, person_id: &str) -> Result<Person> {
        let url = format!("{}/people/{}", self.base_url, person_id);
        let envelope: RawPersonEnvelope = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(person_id, "processing person");

        let outcome = serde_json::from_value::<RawPerson>(envelope.data.clone())
            .map_err(|err| CollectionsError::structure(err.to_string()))
            .and_then(|raw| person_from_raw(&raw));

        match outcome {
            Ok(person) => Ok(person),
            Err(err) if err.is_structural() => {
                self.report_rejected("person", &envelope.data, &err);
                Err(err)
            },
            Err(err) => Err(err),
        }
    }

    /// Fetch one page of the object search endpoint for a category,
    /// transform every record, and resolve nested person references.
    ///
    /// Returns the surviving objects indexed by their upstream id.
    pub async fn fetch_objects(
        &self,
        category: &str,
        page: u32,
        page_size: u32,
    ) -> Result<HashMap<String, MuseumObject>> {
        let url = format!("{}/search/objects", self.base_url);
        let response: RawSearchPage = self
            .http
            .get(&url)
            .query(&[
                ("filter[categories]", category),
                ("page[number]", &page.to_string()),
                ("page[size]", &page_size.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        info!(count = response.data.len(), category, page, "found objects");

        let mut drafts = Vec::new();
        for value in response.data {
            let outcome = serde_json::from_value::<RawObject>(value.clone())
                .map_err(|err| CollectionsError::structure(err.to_string()))
                .and_then(|raw| object_from_raw(&raw));

            match outcome {
                Ok(draft) => {
                    debug!(object_id = %draft.object.id, "processing object");
                    drafts.push((value, draft));
                },
                Err(err) if err.is_structural() => self.report_rejected("object", &value, &err),
                Err(err) => return Err(err),
            }
        }

        // Person fan-out spans the whole page; the cap bounds total
        // in-flight lookups regardless of how reference-heavy the page is.
        let resolved: Vec<Option<(String, MuseumObject)>> = stream::iter(drafts)
            .map(|(value, draft)| self.resolve_draft(value, draft))
            .buffer_unordered(self.fetch_concurrency)
            .try_collect()
            .await?;

        Ok(resolved.into_iter().flatten().collect())
    }

    /// Resolve one draft's maker and related-person references.
    ///
    /// Returns `Ok(None)` when a referenced person is structurally
    /// broken, which rejects the whole object record.
    async fn resolve_draft(
        &self,
        value: serde_json::Value,
        draft: ObjectDraft,
    ) -> Result<Option<(String, MuseumObject)>> {
        let ObjectDraft {
            mut object,
            maker_uids,
            related_person_ids,
        } = draft;

        let resolved = future::try_join(
            self.fetch_people(&maker_uids),
            self.fetch_people(&related_person_ids),
        )
        .await;

        match resolved {
            Ok((makers, related)) => {
                object.creation_makers = makers;
                object.people_relations = related;
                Ok(Some((object.id.clone(), object)))
            },
            Err(err) if err.is_structural() => {
                self.report_rejected("object", &value, &err);
                Ok(None)
            },
            Err(err) => Err(err),
        }
    }

    /// Fetch a list of people concurrently, preserving input order.
    async fn fetch_people(&self, ids: &[String]) -> Result<Vec<Person>> {
        stream::iter(ids)
            .map(|id| self.fetch_person(id))
            .buffered(self.fetch_concurrency)
            .try_collect()
            .await
    }

    /// Dump a structurally broken record and log where it went.
    fn report_rejected(&self, kind: &str, raw: &serde_json::Value, err: &CollectionsError) {
        match dump_record(&self.dump_dir, raw, err) {
            Ok(path) => {
                error!(kind, %err, dump = %path.display(), "record rejected, raw document dumped")
            },
            Err(dump_err) => {
                error!(kind, %err, %dump_err, "record rejected, dump failed")
            },
        }
    }
}
