//! Domain entities for the collections data pipeline
//!
//! These hold data from the collections API between the transform and
//! load stages. Every entity is rebuilt fresh for one page of one
//! category and discarded after it is persisted; ids are the upstream
//! API's identifiers and serve as the upsert keys.

use chrono::NaiveDate;

/// A person or organisation referenced by museum objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub id: String,
    pub name: Option<String>,
    pub note: Option<String>,
    pub description: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub occupation: Option<String>,
    pub url: Option<String>,
}

impl Person {
    pub fn new(id: impl Into<String>) -> Self {
        Person {
            id: id.into(),
            ..Person::default()
        }
    }
}

/// A place associated with an object's creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: String,
    pub name: String,
}

/// A physical location where an object is on display.
#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    pub id: String,
    pub name: String,
}

/// A museum object, the central entity of the graph.
///
/// `category` is assigned by the pipeline from the run-local category
/// list, not taken from upstream data. `images` ordering is significant:
/// index 0 is the designated thumbnail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MuseumObject {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub accession: Option<String>,
    pub category: Option<i16>,
    pub url: Option<String>,

    pub creation_earliest: Option<i16>,
    pub creation_latest: Option<i16>,
    pub on_display: Option<Facility>,

    pub creation_makers: Vec<Person>,
    pub creation_places: Vec<Place>,
    pub images: Vec<String>,
    pub people_relations: Vec<Person>,
}

impl MuseumObject {
    pub fn new(id: impl Into<String>) -> Self {
        MuseumObject {
            id: id.into(),
            ..MuseumObject::default()
        }
    }
}
