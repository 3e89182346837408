use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, DemographicTarget, DemographicTargetInput, ListingCore, ListingImage,
    ListingImageInput, ListingSummary, NewDemographicTarget, NewListing, NewListingImage,
    NewPropertyFeature, NewUrgencySetting, NewUser, PropertyFeature, PropertyFeatureInput,
    UrgencySetting, UrgencySettingInput, User,
};

/// Read and write access to listings and the tables hanging off them.
///
/// Every fetcher is scoped by listing id and side-effect free.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;

    /// All listings with category and owner names, newest first.
    async fn list_listings(&self) -> Result<Vec<ListingSummary>, DatabaseError>;

    /// The listing joined with its category and owner, or `None` when no row
    /// matches (including a dangling category or owner reference).
    async fn fetch_listing_core(&self, listing_id: i32) -> Result<Option<ListingCore>, DatabaseError>;

    async fn fetch_images(&self, listing_id: i32) -> Result<Vec<ListingImage>, DatabaseError>;

    async fn fetch_features(&self, listing_id: i32) -> Result<Vec<PropertyFeature>, DatabaseError>;

    async fn fetch_demographics(&self, listing_id: i32) -> Result<Option<DemographicTarget>, DatabaseError>;

    async fn fetch_urgency(&self, listing_id: i32) -> Result<Option<UrgencySetting>, DatabaseError>;

    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError>;

    /// Inserts the listing and any nested rows as one unit; returns the new id.
    async fn create_listing(&self, listing: &NewListing) -> Result<i32, DatabaseError>;

    async fn create_listing_image(&self, image: &NewListingImage) -> Result<(), DatabaseError>;

    async fn create_property_feature(&self, feature: &NewPropertyFeature) -> Result<(), DatabaseError>;

    async fn create_demographic_target(&self, target: &NewDemographicTarget) -> Result<(), DatabaseError>;

    async fn create_urgency_setting(&self, setting: &NewUrgencySetting) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> Result<i32, DatabaseError>;

    async fn find_users_by_email(&self, email: &str) -> Result<Vec<User>, DatabaseError>;

    async fn find_user_by_credentials(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, DatabaseError>;
}

const LISTING_COLUMNS: &str = "l.id, l.title, l.description, l.price, l.location, l.city, l.state, \
     l.country, l.category_id, l.user_id, l.main_image_url, l.created_at, l.updated_at";

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, full_name, \
     phone_number, whatsapp_link, avatar_url, user_type, created_at, updated_at";

/// PostgreSQL-backed repository over the shared pool.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingRepository for PgRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_listings(&self) -> Result<Vec<ListingSummary>, DatabaseError> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS}, c.name AS category_name, u.full_name AS owner_name
             FROM listings l
             JOIN categories c ON l.category_id = c.id
             JOIN users u ON l.user_id = u.id
             ORDER BY l.created_at DESC, l.id DESC"
        );
        let rows = sqlx::query_as::<_, ListingSummary>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn fetch_listing_core(&self, listing_id: i32) -> Result<Option<ListingCore>, DatabaseError> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS}, c.name AS category_name, u.full_name AS owner_name,
                    u.phone_number, u.whatsapp_link
             FROM listings l
             JOIN categories c ON l.category_id = c.id
             JOIN users u ON l.user_id = u.id
             WHERE l.id = $1"
        );
        let row = sqlx::query_as::<_, ListingCore>(&sql)
            .bind(listing_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn fetch_images(&self, listing_id: i32) -> Result<Vec<ListingImage>, DatabaseError> {
        let rows = sqlx::query_as::<_, ListingImage>(
            "SELECT id, listing_id, image_url, is_main, display_order, created_at
             FROM listing_images
             WHERE listing_id = $1
             ORDER BY display_order, id",
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn fetch_features(&self, listing_id: i32) -> Result<Vec<PropertyFeature>, DatabaseError> {
        let rows = sqlx::query_as::<_, PropertyFeature>(
            "SELECT id, listing_id, feature_type, feature_value, created_at
             FROM property_features
             WHERE listing_id = $1
             ORDER BY id",
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn fetch_demographics(&self, listing_id: i32) -> Result<Option<DemographicTarget>, DatabaseError> {
        let row = sqlx::query_as::<_, DemographicTarget>(
            "SELECT listing_id, countries, states, lgas, age_group, social_class, occupations, created_at
             FROM demographic_targets
             WHERE listing_id = $1
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(listing_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn fetch_urgency(&self, listing_id: i32) -> Result<Option<UrgencySetting>, DatabaseError> {
        let row = sqlx::query_as::<_, UrgencySetting>(
            "SELECT listing_id, reason, deadline, is_active, created_at
             FROM urgency_settings
             WHERE listing_id = $1
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(listing_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let rows = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_listing(&self, listing: &NewListing) -> Result<i32, DatabaseError> {
        // Dropping the transaction without commit rolls every insert back.
        let mut tx = self.pool.begin().await?;

        let (listing_id,): (i32,) = sqlx::query_as(
            "INSERT INTO listings (title, description, price, location, city, state, country,
                                   category_id, user_id, main_image_url, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW())
             RETURNING id",
        )
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(&listing.location)
        .bind(&listing.city)
        .bind(&listing.state)
        .bind(&listing.country)
        .bind(listing.category_id)
        .bind(listing.user_id)
        .bind(&listing.main_image_url)
        .fetch_one(&mut *tx)
        .await?;

        for image in &listing.images {
            insert_image(&mut *tx, listing_id, image).await?;
        }
        for feature in &listing.features {
            insert_feature(&mut *tx, listing_id, feature).await?;
        }
        if let Some(target) = &listing.demographic_targets {
            insert_demographic_target(&mut *tx, listing_id, target).await?;
        }
        if let Some(setting) = &listing.urgency_settings {
            insert_urgency_setting(&mut *tx, listing_id, setting).await?;
        }

        tx.commit().await?;
        Ok(listing_id)
    }

    async fn create_listing_image(&self, image: &NewListingImage) -> Result<(), DatabaseError> {
        insert_image(&self.pool, image.listing_id, &image.image).await
    }

    async fn create_property_feature(&self, feature: &NewPropertyFeature) -> Result<(), DatabaseError> {
        insert_feature(&self.pool, feature.listing_id, &feature.feature).await
    }

    async fn create_demographic_target(&self, target: &NewDemographicTarget) -> Result<(), DatabaseError> {
        insert_demographic_target(&self.pool, target.listing_id, &target.target).await
    }

    async fn create_urgency_setting(&self, setting: &NewUrgencySetting) -> Result<(), DatabaseError> {
        insert_urgency_setting(&self.pool, setting.listing_id, &setting.setting).await
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn create_user(&self, user: &NewUser) -> Result<i32, DatabaseError> {
        let (id,): (i32,) = sqlx::query_as(
            "INSERT INTO users (email, password_hash, first_name, last_name, full_name, phone_number,
                                whatsapp_link, avatar_url, user_type, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
             RETURNING id",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.full_name)
        .bind(&user.phone_number)
        .bind(&user.whatsapp_link)
        .bind(&user.avatar_url)
        .bind(&user.user_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn find_users_by_email(&self, email: &str) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 ORDER BY id");
        let rows = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_user_by_credentials(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND password_hash = $2 ORDER BY id LIMIT 1"
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(password_hash)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

async fn insert_image<'e, E>(executor: E, listing_id: i32, image: &ListingImageInput) -> Result<(), DatabaseError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO listing_images (listing_id, image_url, is_main, display_order, created_at)
         VALUES ($1, $2, $3, $4, NOW())",
    )
    .bind(listing_id)
    .bind(&image.image_url)
    .bind(image.is_main)
    .bind(image.display_order)
    .execute(executor)
    .await?;
    Ok(())
}

async fn insert_feature<'e, E>(executor: E, listing_id: i32, feature: &PropertyFeatureInput) -> Result<(), DatabaseError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO property_features (listing_id, feature_type, feature_value, created_at)
         VALUES ($1, $2, $3, NOW())",
    )
    .bind(listing_id)
    .bind(&feature.feature_type)
    .bind(&feature.feature_value)
    .execute(executor)
    .await?;
    Ok(())
}

async fn insert_demographic_target<'e, E>(
    executor: E,
    listing_id: i32,
    target: &DemographicTargetInput,
) -> Result<(), DatabaseError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO demographic_targets (listing_id, countries, states, lgas, age_group,
                                          social_class, occupations, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())",
    )
    .bind(listing_id)
    .bind(Json(&target.countries))
    .bind(Json(&target.states))
    .bind(Json(&target.lgas))
    .bind(&target.age_group)
    .bind(&target.social_class)
    .bind(Json(&target.occupations))
    .execute(executor)
    .await?;
    Ok(())
}

async fn insert_urgency_setting<'e, E>(
    executor: E,
    listing_id: i32,
    setting: &UrgencySettingInput,
) -> Result<(), DatabaseError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO urgency_settings (listing_id, reason, deadline, is_active, created_at)
         VALUES ($1, $2, $3, $4, NOW())",
    )
    .bind(listing_id)
    .bind(&setting.reason)
    .bind(setting.deadline)
    .bind(setting.is_active)
    .execute(executor)
    .await?;
    Ok(())
}
