//! In-memory repository for exercising services and the router without
//! PostgreSQL. Counts every fetcher call and can be told to fail at a given
//! point, so tests can observe the aggregation order and its all-or-nothing
//! behaviour.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, DemographicTarget, DemographicTargetInput, Listing, ListingCore, ListingImage,
    ListingImageInput, ListingSummary, NewDemographicTarget, NewListing, NewListingImage,
    NewPropertyFeature, NewUrgencySetting, NewUser, PropertyFeature, PropertyFeatureInput,
    UrgencySetting, UrgencySettingInput, User,
};
use crate::database::repository::{ListingRepository, UserRepository};

/// Points at which the repository can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    Ping,
    ListingCore,
    Images,
    Features,
    Demographics,
    Urgency,
    InsertImage,
    InsertFeature,
    InsertDemographics,
    InsertUrgency,
}

/// Snapshot of how often each fetcher ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchCalls {
    pub listing_core: usize,
    pub images: usize,
    pub features: usize,
    pub demographics: usize,
    pub urgency: usize,
}

impl FetchCalls {
    pub fn related(&self) -> usize {
        self.images + self.features + self.demographics + self.urgency
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    categories: Vec<Category>,
    users: Vec<User>,
    listings: Vec<Listing>,
    images: Vec<ListingImage>,
    features: Vec<PropertyFeature>,
    demographics: Vec<DemographicTarget>,
    urgency: Vec<UrgencySetting>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn push_image(&mut self, listing_id: i32, image: &ListingImageInput) {
        let id = self.next_id();
        self.images.push(ListingImage {
            id,
            listing_id,
            image_url: image.image_url.clone(),
            is_main: image.is_main,
            display_order: image.display_order,
            created_at: Utc::now(),
        });
    }

    fn push_feature(&mut self, listing_id: i32, feature: &PropertyFeatureInput) {
        let id = self.next_id();
        self.features.push(PropertyFeature {
            id,
            listing_id,
            feature_type: feature.feature_type.clone(),
            feature_value: feature.feature_value.clone(),
            created_at: Utc::now(),
        });
    }

    fn push_demographics(&mut self, listing_id: i32, target: &DemographicTargetInput) {
        self.demographics.push(DemographicTarget {
            listing_id,
            countries: Json(target.countries.clone()),
            states: Json(target.states.clone()),
            lgas: Json(target.lgas.clone()),
            age_group: target.age_group.clone(),
            social_class: target.social_class.clone(),
            occupations: Json(target.occupations.clone()),
            created_at: Utc::now(),
        });
    }

    fn push_urgency(&mut self, listing_id: i32, setting: &UrgencySettingInput) {
        self.urgency.push(UrgencySetting {
            listing_id,
            reason: setting.reason.clone(),
            deadline: setting.deadline,
            is_active: setting.is_active,
            created_at: Utc::now(),
        });
    }

    fn has_listing(&self, listing_id: i32) -> bool {
        self.listings.iter().any(|l| l.id == listing_id)
    }

    fn core(&self, listing: &Listing) -> Option<(String, &User)> {
        let category = self.categories.iter().find(|c| c.id == listing.category_id)?;
        let owner = self.users.iter().find(|u| u.id == listing.user_id)?;
        Some((category.name.clone(), owner))
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
    failure: Mutex<Option<FailurePoint>>,
    listing_core_calls: AtomicUsize,
    image_calls: AtomicUsize,
    feature_calls: AtomicUsize,
    demographic_calls: AtomicUsize,
    urgency_calls: AtomicUsize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_category(&self, name: &str) -> i32 {
        let mut tables = self.lock();
        let id = tables.next_id();
        tables.categories.push(Category {
            id,
            name: name.to_string(),
        });
        id
    }

    /// Makes every later operation at `point` fail with a query error.
    pub fn fail_at(&self, point: FailurePoint) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(point);
    }

    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn calls(&self) -> FetchCalls {
        FetchCalls {
            listing_core: self.listing_core_calls.load(Ordering::SeqCst),
            images: self.image_calls.load(Ordering::SeqCst),
            features: self.feature_calls.load(Ordering::SeqCst),
            demographics: self.demographic_calls.load(Ordering::SeqCst),
            urgency: self.urgency_calls.load(Ordering::SeqCst),
        }
    }

    pub fn listing_count(&self) -> usize {
        self.lock().listings.len()
    }

    /// Total rows across the image, feature, demographic and urgency tables.
    pub fn related_row_count(&self) -> usize {
        let tables = self.lock();
        tables.images.len() + tables.features.len() + tables.demographics.len() + tables.urgency.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self, point: FailurePoint) -> Result<(), DatabaseError> {
        let failure = *self.failure.lock().unwrap_or_else(|e| e.into_inner());
        if failure == Some(point) {
            return Err(DatabaseError::QueryError(format!("injected failure at {:?}", point)));
        }
        Ok(())
    }
}

fn foreign_key_violation(table: &str) -> DatabaseError {
    DatabaseError::QueryError(format!(
        "insert or update on table \"{}\" violates foreign key constraint",
        table
    ))
}

#[async_trait]
impl ListingRepository for MemoryRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.check(FailurePoint::Ping)
    }

    async fn list_listings(&self) -> Result<Vec<ListingSummary>, DatabaseError> {
        let tables = self.lock();
        let mut rows: Vec<ListingSummary> = tables
            .listings
            .iter()
            .filter_map(|listing| {
                let (category_name, owner) = tables.core(listing)?;
                Some(ListingSummary {
                    listing: listing.clone(),
                    category_name,
                    owner_name: owner.full_name.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.listing
                .created_at
                .cmp(&a.listing.created_at)
                .then(b.listing.id.cmp(&a.listing.id))
        });
        Ok(rows)
    }

    async fn fetch_listing_core(&self, listing_id: i32) -> Result<Option<ListingCore>, DatabaseError> {
        self.listing_core_calls.fetch_add(1, Ordering::SeqCst);
        self.check(FailurePoint::ListingCore)?;
        let tables = self.lock();
        let core = tables
            .listings
            .iter()
            .find(|l| l.id == listing_id)
            .and_then(|listing| {
                let (category_name, owner) = tables.core(listing)?;
                Some(ListingCore {
                    listing: listing.clone(),
                    category_name,
                    owner_name: owner.full_name.clone(),
                    phone_number: owner.phone_number.clone(),
                    whatsapp_link: owner.whatsapp_link.clone(),
                })
            });
        Ok(core)
    }

    // Rows come back in insertion order; ordering is the caller's concern here.
    async fn fetch_images(&self, listing_id: i32) -> Result<Vec<ListingImage>, DatabaseError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.check(FailurePoint::Images)?;
        let tables = self.lock();
        Ok(tables
            .images
            .iter()
            .filter(|i| i.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn fetch_features(&self, listing_id: i32) -> Result<Vec<PropertyFeature>, DatabaseError> {
        self.feature_calls.fetch_add(1, Ordering::SeqCst);
        self.check(FailurePoint::Features)?;
        let tables = self.lock();
        Ok(tables
            .features
            .iter()
            .filter(|f| f.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn fetch_demographics(&self, listing_id: i32) -> Result<Option<DemographicTarget>, DatabaseError> {
        self.demographic_calls.fetch_add(1, Ordering::SeqCst);
        self.check(FailurePoint::Demographics)?;
        let tables = self.lock();
        Ok(tables
            .demographics
            .iter()
            .rev()
            .find(|d| d.listing_id == listing_id)
            .cloned())
    }

    async fn fetch_urgency(&self, listing_id: i32) -> Result<Option<UrgencySetting>, DatabaseError> {
        self.urgency_calls.fetch_add(1, Ordering::SeqCst);
        self.check(FailurePoint::Urgency)?;
        let tables = self.lock();
        Ok(tables
            .urgency
            .iter()
            .rev()
            .find(|u| u.listing_id == listing_id)
            .cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let mut rows = self.lock().categories.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn create_listing(&self, listing: &NewListing) -> Result<i32, DatabaseError> {
        let mut tables = self.lock();

        // Work on a copy and swap it in only once every insert succeeded.
        let mut staged = tables.clone();
        if !staged.categories.iter().any(|c| c.id == listing.category_id)
            || !staged.users.iter().any(|u| u.id == listing.user_id)
        {
            return Err(foreign_key_violation("listings"));
        }

        let listing_id = staged.next_id();
        let now = Utc::now();
        staged.listings.push(Listing {
            id: listing_id,
            title: listing.title.clone(),
            description: listing.description.clone(),
            price: listing.price,
            location: listing.location.clone(),
            city: listing.city.clone(),
            state: listing.state.clone(),
            country: listing.country.clone(),
            category_id: listing.category_id,
            user_id: listing.user_id,
            main_image_url: listing.main_image_url.clone(),
            created_at: now,
            updated_at: now,
        });

        for image in &listing.images {
            self.check(FailurePoint::InsertImage)?;
            staged.push_image(listing_id, image);
        }
        for feature in &listing.features {
            self.check(FailurePoint::InsertFeature)?;
            staged.push_feature(listing_id, feature);
        }
        if let Some(target) = &listing.demographic_targets {
            self.check(FailurePoint::InsertDemographics)?;
            staged.push_demographics(listing_id, target);
        }
        if let Some(setting) = &listing.urgency_settings {
            self.check(FailurePoint::InsertUrgency)?;
            staged.push_urgency(listing_id, setting);
        }

        *tables = staged;
        Ok(listing_id)
    }

    async fn create_listing_image(&self, image: &NewListingImage) -> Result<(), DatabaseError> {
        self.check(FailurePoint::InsertImage)?;
        let mut tables = self.lock();
        if !tables.has_listing(image.listing_id) {
            return Err(foreign_key_violation("listing_images"));
        }
        tables.push_image(image.listing_id, &image.image);
        Ok(())
    }

    async fn create_property_feature(&self, feature: &NewPropertyFeature) -> Result<(), DatabaseError> {
        self.check(FailurePoint::InsertFeature)?;
        let mut tables = self.lock();
        if !tables.has_listing(feature.listing_id) {
            return Err(foreign_key_violation("property_features"));
        }
        tables.push_feature(feature.listing_id, &feature.feature);
        Ok(())
    }

    async fn create_demographic_target(&self, target: &NewDemographicTarget) -> Result<(), DatabaseError> {
        self.check(FailurePoint::InsertDemographics)?;
        let mut tables = self.lock();
        if !tables.has_listing(target.listing_id) {
            return Err(foreign_key_violation("demographic_targets"));
        }
        tables.push_demographics(target.listing_id, &target.target);
        Ok(())
    }

    async fn create_urgency_setting(&self, setting: &NewUrgencySetting) -> Result<(), DatabaseError> {
        self.check(FailurePoint::InsertUrgency)?;
        let mut tables = self.lock();
        if !tables.has_listing(setting.listing_id) {
            return Err(foreign_key_violation("urgency_settings"));
        }
        tables.push_urgency(setting.listing_id, &setting.setting);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn create_user(&self, user: &NewUser) -> Result<i32, DatabaseError> {
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::QueryError(
                "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
            ));
        }
        let id = tables.next_id();
        let now = Utc::now();
        tables.users.push(User {
            id,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name.clone(),
            phone_number: user.phone_number.clone(),
            whatsapp_link: user.whatsapp_link.clone(),
            avatar_url: user.avatar_url.clone(),
            user_type: user.user_type.clone(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn find_users_by_email(&self, email: &str) -> Result<Vec<User>, DatabaseError> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|u| u.email == email)
            .cloned()
            .collect())
    }

    async fn find_user_by_credentials(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, DatabaseError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.email == email && u.password_hash == password_hash)
            .cloned())
    }
}

/// A user body with only the fields tests usually care about.
pub fn new_user(email: &str, password_hash: &str, full_name: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        first_name: None,
        last_name: None,
        full_name: Some(full_name.to_string()),
        phone_number: Some("+2348012345678".to_string()),
        whatsapp_link: Some("https://wa.me/2348012345678".to_string()),
        avatar_url: None,
        user_type: Some("agent".to_string()),
    }
}

/// A listing body with no nested rows.
pub fn new_listing(title: &str, category_id: i32, user_id: i32) -> NewListing {
    NewListing {
        title: title.to_string(),
        description: Some("Spacious and well lit".to_string()),
        price: rust_decimal::Decimal::new(2500000000, 2),
        location: Some("14 Admiralty Way".to_string()),
        city: Some("Lekki".to_string()),
        state: Some("Lagos".to_string()),
        country: Some("Nigeria".to_string()),
        category_id,
        user_id,
        main_image_url: None,
        images: vec![],
        features: vec![],
        demographic_targets: None,
        urgency_settings: None,
    }
}
