//! Typed representation of collections API payloads
//!
//! The upstream API returns deeply nested JSON whose sub-structures are
//! frequently absent. Payloads are validated once at the boundary by
//! deserializing into these types; everything a record is not guaranteed
//! to carry is an `Option`, so the transformers operate on
//! known-present-or-explicitly-optional fields instead of repeated
//! membership checks. A record that fails to deserialize is treated as a
//! structural parse failure and dumped for inspection.

use serde::Deserialize;

/// One page of the object search endpoint.
#[derive(Debug, Deserialize)]
pub struct RawSearchPage {
    pub data: Vec<serde_json::Value>,
}

/// Envelope around a single person document.
#[derive(Debug, Deserialize)]
pub struct RawPersonEnvelope {
    pub data: serde_json::Value,
}

/// One tagged variant of an attribute. Several variants may exist for a
/// field; the one flagged `primary` is the canonical value.
#[derive(Debug, Clone, Deserialize)]
pub struct TaggedValue {
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub value: Option<String>,
}

/// Select the primary value from a list of tagged attribute variants.
///
/// Returns the value of the first element whose primary flag is set, or
/// `None` when the field is absent, no element is marked primary, or the
/// primary element carries no value.
pub fn primary_value(values: Option<&[TaggedValue]>) -> Option<String> {
    values?
        .iter()
        .find(|v| v.primary)
        .and_then(|v| v.value.clone())
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLinks {
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
}

/// Administrative identity block carried by referenced entities.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAdmin {
    pub uid: String,
}

/// A reference to another entity embedded in an object record, carrying
/// at most an admin block and a display title.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSummaryRef {
    #[serde(default)]
    pub admin: Option<RawAdmin>,
    #[serde(default)]
    pub summary_title: Option<String>,
}

// ---------------------------------------------------------------------------
// Person documents (people endpoint)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RawPerson {
    pub id: String,
    #[serde(default)]
    pub attributes: RawPersonAttributes,
    #[serde(default)]
    pub links: Option<RawLinks>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPersonAttributes {
    #[serde(default)]
    pub name: Option<Vec<TaggedValue>>,
    #[serde(default)]
    pub note: Option<Vec<TaggedValue>>,
    #[serde(default)]
    pub description: Option<Vec<TaggedValue>>,
    #[serde(default)]
    pub lifecycle: Option<RawPersonLifecycle>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub nationality: Option<Vec<String>>,
    #[serde(default)]
    pub occupation: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPersonLifecycle {
    #[serde(default)]
    pub birth: Option<Vec<RawLifeEvent>>,
    #[serde(default)]
    pub death: Option<Vec<RawLifeEvent>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLifeEvent {
    #[serde(default)]
    pub date: Option<Vec<TaggedValue>>,
}

// ---------------------------------------------------------------------------
// Object documents (search endpoint)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RawObject {
    pub id: String,
    #[serde(default)]
    pub attributes: RawObjectAttributes,
    #[serde(default)]
    pub relationships: Option<RawRelationships>,
    #[serde(default)]
    pub links: Option<RawLinks>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawObjectAttributes {
    #[serde(default)]
    pub description: Option<Vec<TaggedValue>>,
    #[serde(default)]
    pub identifier: Option<Vec<TaggedValue>>,
    #[serde(default)]
    pub title: Option<Vec<TaggedValue>>,
    #[serde(default)]
    pub name: Option<Vec<TaggedValue>>,
    #[serde(default)]
    pub lifecycle: Option<RawObjectLifecycle>,
    #[serde(default)]
    pub multimedia: Option<Vec<RawMultimedia>>,
    #[serde(default)]
    pub locations: Option<Vec<RawLocation>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawObjectLifecycle {
    #[serde(default)]
    pub creation: Option<Vec<RawCreation>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCreation {
    #[serde(default)]
    pub date: Option<Vec<RawCreationDate>>,
    #[serde(default)]
    pub maker: Option<Vec<RawSummaryRef>>,
    #[serde(default)]
    pub places: Option<Vec<RawSummaryRef>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCreationDate {
    #[serde(default)]
    pub earliest: Option<i16>,
    #[serde(default)]
    pub latest: Option<i16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMultimedia {
    #[serde(default)]
    pub processed: Option<RawProcessed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProcessed {
    #[serde(default)]
    pub medium_thumbnail: Option<RawAsset>,
    #[serde(default)]
    pub large: Option<RawAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAsset {
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub facilities: Option<Vec<RawSummaryRef>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRelationships {
    #[serde(default)]
    pub people: Option<RawRelatedPeople>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRelatedPeople {
    pub data: Vec<RawPersonRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPersonRef {
    pub id: String,
}
