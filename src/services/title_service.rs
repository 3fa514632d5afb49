//! Title service

use std::collections::{BTreeSet, HashMap};

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::repositories::{TaxonomyRepository, TitleRepository},
    error::{AppError, AppResult},
    models::{NewTitle, Taxon, Taxonomy, Title, TitleChanges, TitleFilter},
};

/// A title together with its genres and category
#[derive(Debug, Clone)]
pub struct TitleDetails {
    pub title: Title,
    pub genres: Vec<Taxon>,
    pub category: Option<Taxon>,
}

/// Changes requested for a title, with relations given by slug
#[derive(Debug, Clone, Default)]
pub struct TitleUpdate {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    pub category: Option<String>,
}

/// Title service for business logic
pub struct TitleService;

impl TitleService {
    /// List titles matching `filter`
    pub async fn list(
        pool: &PgPool,
        filter: &TitleFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<TitleDetails>, i64)> {
        let (titles, total) = TitleRepository::list(pool, filter, offset, limit).await?;
        let details = Self::attach_relations(pool, titles).await?;
        Ok((details, total))
    }

    /// Get a title by ID
    pub async fn get(pool: &PgPool, id: &Uuid) -> AppResult<TitleDetails> {
        let title = Self::find(pool, id).await?;
        let mut details = Self::attach_relations(pool, vec![title]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::NotFound("Title not found".to_string()))
    }

    /// Fail with 404 unless the title exists
    pub async fn find(pool: &PgPool, id: &Uuid) -> AppResult<Title> {
        TitleRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Title not found".to_string()))
    }

    /// Create a title
    pub async fn create(
        pool: &PgPool,
        name: &str,
        year: i32,
        description: Option<&str>,
        genre_slugs: &[String],
        category_slug: Option<&str>,
    ) -> AppResult<TitleDetails> {
        let genre_ids = Self::resolve_genres(pool, genre_slugs).await?;
        let category_id = match category_slug {
            Some(slug) => Some(Self::resolve_category(pool, slug).await?),
            None => None,
        };

        let new = NewTitle {
            name: name.to_string(),
            year,
            description: description.map(str::to_string),
            category_id,
        };

        let mut tx = pool.begin().await?;
        let title = TitleRepository::create(&mut *tx, &new).await?;
        TaxonomyRepository::set_title_genres(&mut *tx, &title.id, &genre_ids).await?;
        tx.commit().await?;

        info!(title_id = %title.id, name = %title.name, "Title created");
        Self::get(pool, &title.id).await
    }

    /// Update a title; a given genre list replaces the current one
    pub async fn update(pool: &PgPool, id: &Uuid, update: TitleUpdate) -> AppResult<TitleDetails> {
        let genre_ids = match &update.genre {
            Some(slugs) => Some(Self::resolve_genres(pool, slugs).await?),
            None => None,
        };
        let category_id = match &update.category {
            Some(slug) => Some(Self::resolve_category(pool, slug).await?),
            None => None,
        };

        let changes = TitleChanges {
            name: update.name,
            year: update.year,
            description: update.description,
            category_id,
        };

        let mut tx = pool.begin().await?;
        let title = TitleRepository::update(&mut *tx, id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Title not found".to_string()))?;
        if let Some(genre_ids) = genre_ids {
            TaxonomyRepository::set_title_genres(&mut *tx, &title.id, &genre_ids).await?;
        }
        tx.commit().await?;

        info!(title_id = %title.id, "Title updated");
        Self::get(pool, &title.id).await
    }

    /// Delete a title with its reviews and comments
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        if !TitleRepository::delete(pool, id).await? {
            return Err(AppError::NotFound("Title not found".to_string()));
        }

        info!(title_id = %id, "Title deleted");
        Ok(())
    }

    async fn resolve_genres(pool: &PgPool, slugs: &[String]) -> AppResult<Vec<Uuid>> {
        let wanted: BTreeSet<&str> = slugs.iter().map(String::as_str).collect();
        let found = TaxonomyRepository::find_by_slugs(pool, Taxonomy::Genre, slugs).await?;

        let missing = Self::missing_slugs(&wanted, &found);
        if !missing.is_empty() {
            return Err(AppError::field(
                "genre",
                format!("Unknown genre: {}", missing.join(", ")),
            ));
        }

        Ok(found.into_iter().map(|g| g.id).collect())
    }

    async fn resolve_category(pool: &PgPool, slug: &str) -> AppResult<Uuid> {
        TaxonomyRepository::find_by_slug(pool, Taxonomy::Category, slug)
            .await?
            .map(|c| c.id)
            .ok_or_else(|| AppError::field("category", format!("Unknown category: {}", slug)))
    }

    fn missing_slugs(wanted: &BTreeSet<&str>, found: &[Taxon]) -> Vec<String> {
        let found: BTreeSet<&str> = found.iter().map(|t| t.slug.as_str()).collect();
        wanted
            .difference(&found)
            .map(|s| s.to_string())
            .collect()
    }

    async fn attach_relations(pool: &PgPool, titles: Vec<Title>) -> AppResult<Vec<TitleDetails>> {
        let title_ids: Vec<Uuid> = titles.iter().map(|t| t.id).collect();
        let category_ids: Vec<Uuid> = titles.iter().filter_map(|t| t.category_id).collect();

        let mut genres: HashMap<Uuid, Vec<Taxon>> = HashMap::new();
        for row in TaxonomyRepository::genres_for_titles(pool, &title_ids).await? {
            genres.entry(row.title_id).or_default().push(row.genre);
        }

        let categories: HashMap<Uuid, Taxon> = TaxonomyRepository::categories_by_ids(pool, &category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(titles
            .into_iter()
            .map(|title| TitleDetails {
                genres: genres.remove(&title.id).unwrap_or_default(),
                category: title.category_id.and_then(|id| categories.get(&id).cloned()),
                title,
            })
            .collect())
    }
}
