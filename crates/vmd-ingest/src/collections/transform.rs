//! Entity transformers
//!
//! Pure conversions from validated raw API documents into domain
//! entities. Missing optional data degrades gracefully to `None`;
//! missing *structural* data (an expected key, or an empty list where an
//! element is required) aborts that record with a
//! [`CollectionsError::Structure`] so the caller can dump the raw
//! document and carry on with the rest of the page.

use chrono::NaiveDate;

use super::models::{Facility, MuseumObject, Person, Place};
use super::raw::{primary_value, RawObject, RawPerson};
use super::{CollectionsError, Result, DATE_FORMAT};

/// A transformed object together with the person references that still
/// need to be resolved against the people endpoint. Reference order is
/// preserved through resolution.
#[derive(Debug, Clone)]
pub struct ObjectDraft {
    pub object: MuseumObject,
    pub maker_uids: Vec<String>,
    pub related_person_ids: Vec<String>,
}

/// Build a [`Person`] from a raw person document.
pub fn person_from_raw(raw: &RawPerson) -> Result<Person> {
    let attributes = &raw.attributes;
    let mut person = Person::new(raw.id.clone());

    person.name = primary_value(attributes.name.as_deref());
    person.note = primary_value(attributes.note.as_deref());
    person.description = primary_value(attributes.description.as_deref());

    if let Some(lifecycle) = &attributes.lifecycle {
        let birth = match &lifecycle.birth {
            Some(events) => {
                let event = events
                    .first()
                    .ok_or_else(|| CollectionsError::structure("lifecycle.birth[0]"))?;
                primary_value(event.date.as_deref())
            },
            None => None,
        };
        let death = match &lifecycle.death {
            Some(events) => {
                let event = events
                    .first()
                    .ok_or_else(|| CollectionsError::structure("lifecycle.death[0]"))?;
                primary_value(event.date.as_deref())
            },
            None => None,
        };

        let (birth_date, death_date) = parse_date_pair(birth.as_deref(), death.as_deref());
        person.birth_date = birth_date;
        person.death_date = death_date;
    }

    person.gender = attributes.gender.clone();

    if let Some(nationality) = &attributes.nationality {
        let first = nationality
            .first()
            .ok_or_else(|| CollectionsError::structure("nationality[0]"))?;
        person.nationality = Some(title_case(first));
    }

    if let Some(occupation) = &attributes.occupation {
        let first = occupation
            .first()
            .ok_or_else(|| CollectionsError::structure("occupation[0]"))?;
        person.occupation = Some(title_case(first));
    }

    person.url = Some(self_link(raw.links.as_ref().and_then(|l| l.self_url.clone()))?);

    Ok(person)
}

/// Build an [`ObjectDraft`] from a raw object document.
///
/// Places are side-loaded from the embedded summaries; maker and related
/// person references are returned unresolved for the client to fan out.
pub fn object_from_raw(raw: &RawObject) -> Result<ObjectDraft> {
    let attributes = &raw.attributes;
    let mut object = MuseumObject::new(raw.id.clone());
    let mut maker_uids = Vec::new();
    let mut related_person_ids = Vec::new();

    object.description = primary_value(attributes.description.as_deref());
    object.accession = primary_value(attributes.identifier.as_deref());

    // Prefer the title field, falling back to name when absent.
    object.title = match &attributes.title {
        Some(values) => primary_value(Some(values.as_slice())),
        None => primary_value(attributes.name.as_deref()),
    };

    if let Some(creation_events) = attributes
        .lifecycle
        .as_ref()
        .and_then(|l| l.creation.as_ref())
    {
        let creation = creation_events
            .first()
            .ok_or_else(|| CollectionsError::structure("lifecycle.creation[0]"))?;

        if let Some(dates) = &creation.date {
            let date = dates
                .first()
                .ok_or_else(|| CollectionsError::structure("lifecycle.creation[0].date[0]"))?;
            object.creation_earliest = date.earliest;
            object.creation_latest = date.latest;
        }

        if let Some(makers) = &creation.maker {
            maker_uids = makers
                .iter()
                .filter_map(|m| m.admin.as_ref())
                .map(|admin| admin.uid.clone())
                .collect();
        }

        if let Some(places) = &creation.places {
            for entry in places {
                let Some(admin) = &entry.admin else {
                    continue;
                };
                let name = entry
                    .summary_title
                    .clone()
                    .ok_or_else(|| CollectionsError::structure("creation.places.summary_title"))?;
                object.creation_places.push(Place {
                    id: admin.uid.clone(),
                    name,
                });
            }
        }
    }

    if let Some(multimedia) = &attributes.multimedia {
        for (index, entry) in multimedia.iter().enumerate() {
            let processed = entry
                .processed
                .as_ref()
                .ok_or_else(|| CollectionsError::structure("multimedia.processed"))?;

            let large = processed
                .large
                .as_ref()
                .ok_or_else(|| CollectionsError::structure("multimedia.processed.large"))?;
            let large_path = public_path(asset_location(
                large.location.as_deref(),
                "multimedia.processed.large.location",
            )?);

            // The first entry must carry a medium thumbnail; its large
            // path is stored once as the thumbnail at index 0 and again
            // by the loop below, so the display client can read index 0
            // separately from the gallery.
            if index == 0 {
                processed.medium_thumbnail.as_ref().ok_or_else(|| {
                    CollectionsError::structure("multimedia[0].processed.medium_thumbnail")
                })?;
                object.images.push(large_path.clone());
            }

            object.images.push(large_path);
        }
    }

    if let Some(locations) = &attributes.locations {
        for entry in locations {
            if entry.purpose.as_deref() != Some("on display") {
                continue;
            }
            let facility = entry
                .facilities
                .as_ref()
                .and_then(|f| f.first())
                .ok_or_else(|| CollectionsError::structure("locations.facilities[0]"))?;
            let admin = facility
                .admin
                .as_ref()
                .ok_or_else(|| CollectionsError::structure("locations.facilities[0].admin"))?;
            let name = facility
                .summary_title
                .clone()
                .ok_or_else(|| {
                    CollectionsError::structure("locations.facilities[0].summary_title")
                })?;
            object.on_display = Some(Facility {
                id: admin.uid.clone(),
                name,
            });
        }
    }

    if let Some(people) = raw
        .relationships
        .as_ref()
        .and_then(|r| r.people.as_ref())
    {
        related_person_ids = people.data.iter().map(|r| r.id.clone()).collect();
    }

    object.url = Some(self_link(raw.links.as_ref().and_then(|l| l.self_url.clone()))?);

    Ok(ObjectDraft {
        object,
        maker_uids,
        related_person_ids,
    })
}

fn self_link(url: Option<String>) -> Result<String> {
    url.ok_or_else(|| CollectionsError::structure("links.self"))
}

fn asset_location<'a>(location: Option<&'a str>, path: &str) -> Result<&'a str> {
    location.ok_or_else(|| CollectionsError::structure(path))
}

/// Parse the paired birth/death dates. The pair is atomic on failure: a
/// value that is present but does not match the expected format discards
/// both dates.
fn parse_date_pair(
    birth: Option<&str>,
    death: Option<&str>,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let birth = birth.map(|s| NaiveDate::parse_from_str(s, DATE_FORMAT));
    let death = death.map(|s| NaiveDate::parse_from_str(s, DATE_FORMAT));

    match (birth, death) {
        (Some(Err(_)), _) | (_, Some(Err(_))) => (None, None),
        (birth, death) => (
            birth.and_then(|r| r.ok()),
            death.and_then(|r| r.ok()),
        ),
    }
}

/// Reduce a processed asset location to its public path: the last three
/// path segments, stripping the storage-specific prefix.
fn public_path(location: &str) -> String {
    let segments: Vec<&str> = location.split('/').collect();
    let start = segments.len().saturating_sub(3);
    segments[start..].join("/")
}

/// Title-case a value: uppercase the first letter of each alphabetic
/// run, lowercase the rest.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_alphabetic = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if prev_alphabetic {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alphabetic = true;
        } else {
            out.push(c);
            prev_alphabetic = false;
        }
    }
    out
}
