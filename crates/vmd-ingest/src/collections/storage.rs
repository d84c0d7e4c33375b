//! Load layer for the collections store
//!
//! Persists transformed entities into PostgreSQL. Every write is an
//! `INSERT ... ON CONFLICT DO NOTHING`: rows are created if absent and
//! never modified, so re-running an ingest is safe and upstream edits
//! never propagate. Within one object the writes are ordered to satisfy
//! foreign key dependencies; each statement is its own unit of work, so
//! a failure partway leaves a partial object that a later run completes.

use sqlx::PgPool;
use tracing::info;

use super::models::{MuseumObject, Person};
use super::Result;

/// Storage handler for collections data.
pub struct CollectionsStore {
    db: PgPool,
}

impl CollectionsStore {
    pub fn new(db: PgPool) -> Self {
        CollectionsStore { db }
    }

    /// Insert a category row if absent.
    pub async fn insert_category(&self, category_id: i16, name: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO collections_object_category (id, name)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING",
        )
        .bind(category_id)
        .bind(name)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Insert a person row if absent.
    pub async fn insert_person(&self, person: &Person) -> Result<()> {
        sqlx::query(
            "INSERT INTO collections_person
                    (id, birth_date, death_date, occupation, name, note,
                    description, nationality, collections_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT DO NOTHING",
        )
        .bind(&person.id)
        .bind(person.birth_date)
        .bind(person.death_date)
        .bind(person.occupation.as_deref())
        .bind(person.name.as_deref())
        .bind(person.note.as_deref())
        .bind(person.description.as_deref())
        .bind(person.nationality.as_deref())
        .bind(person.url.as_deref())
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Insert an object and its dependent rows if absent.
    ///
    /// Write order is mandatory: facility before the object row that
    /// references it, the object row before its image/place/person join
    /// rows, person rows before both join kinds.
    pub async fn insert_object(&self, object: &MuseumObject) -> Result<()> {
        if let Some(facility) = &object.on_display {
            sqlx::query(
                "INSERT INTO collections_facility (id, name)
                    VALUES ($1, $2)
                    ON CONFLICT DO NOTHING",
            )
            .bind(&facility.id)
            .bind(&facility.name)
            .execute(&self.db)
            .await?;

            info!(facility_id = %facility.id, name = %facility.name, "created facility");
        }

        sqlx::query(
            "INSERT INTO collections_object
                    (id, name, description, accession, category_id,
                    creation_earliest, creation_latest, on_display_at,
                    collections_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT DO NOTHING",
        )
        .bind(&object.id)
        .bind(object.title.as_deref())
        .bind(object.description.clone().unwrap_or_default())
        .bind(object.accession.as_deref())
        .bind(object.category)
        .bind(object.creation_earliest)
        .bind(object.creation_latest)
        .bind(object.on_display.as_ref().map(|f| f.id.as_str()))
        .bind(object.url.as_deref())
        .execute(&self.db)
        .await?;

        info!(object_id = %object.id, title = object.title.as_deref().unwrap_or(""), "created object");

        info!(
            object_id = %object.id,
            count = object.images.len(),
            "assigning images to object"
        );
        for (index, image) in object.images.iter().enumerate() {
            sqlx::query(
                "INSERT INTO collections_object_image
                        (object_id, image_public_path, is_thumb)
                    VALUES ($1, $2, $3)
                    ON CONFLICT DO NOTHING",
            )
            .bind(&object.id)
            .bind(image)
            .bind(index == 0)
            .execute(&self.db)
            .await?;
        }

        info!(count = object.creation_places.len(), "creating places");
        for place in &object.creation_places {
            sqlx::query(
                "INSERT INTO collections_place (id, name)
                    VALUES ($1, $2)
                    ON CONFLICT DO NOTHING",
            )
            .bind(&place.id)
            .bind(&place.name)
            .execute(&self.db)
            .await?;

            sqlx::query(
                "INSERT INTO collections_object_place (object_id, place_id)
                    VALUES ($1, $2)
                    ON CONFLICT DO NOTHING",
            )
            .bind(&object.id)
            .bind(&place.id)
            .execute(&self.db)
            .await?;
        }

        let people = person_union(&object.creation_makers, &object.people_relations);
        info!(count = people.len(), "creating people");
        for person in people {
            self.insert_person(person).await?;
        }

        info!(
            object_id = %object.id,
            count = object.creation_makers.len(),
            "assigning makers to object"
        );
        for person in &object.creation_makers {
            sqlx::query(
                "INSERT INTO collections_object_maker (object_id, person_id)
                    VALUES ($1, $2)
                    ON CONFLICT DO NOTHING",
            )
            .bind(&object.id)
            .bind(&person.id)
            .execute(&self.db)
            .await?;
        }

        info!(
            object_id = %object.id,
            count = object.people_relations.len(),
            "assigning related people to object"
        );
        for person in &object.people_relations {
            sqlx::query(
                "INSERT INTO collections_object_person (object_id, person_id)
                    VALUES ($1, $2)
                    ON CONFLICT DO NOTHING",
            )
            .bind(&object.id)
            .bind(&person.id)
            .execute(&self.db)
            .await?;
        }

        Ok(())
    }
}

/// Order-preserving union of makers and related people, keyed by id.
/// A person appearing in both lists (or twice in one) is written once.
fn person_union<'a>(makers: &'a [Person], related: &'a [Person]) -> Vec<&'a Person> {
    let mut seen = std::collections::HashSet::new();
    makers
        .iter()
        .chain(related.iter())
        .filter(|p| seen.insert(p.id.as_str()))
        .collect()
}
