use std::sync::Arc;

use tracing::debug;

use crate::database::models::{
    Category, DemographicTarget, ListingCore, ListingDetail, ListingImage, ListingSummary,
    NewDemographicTarget, NewListing, NewListingImage, NewPropertyFeature, NewUrgencySetting,
    PropertyFeature, UrgencySetting,
};
use crate::database::repository::ListingRepository;
use crate::services::error::ServiceError;

/// Listing reads and writes, including the aggregated single-listing view.
#[derive(Clone)]
pub struct ListingService {
    repo: Arc<dyn ListingRepository>,
}

impl ListingService {
    pub fn new(repo: Arc<dyn ListingRepository>) -> Self {
        Self { repo }
    }

    /// Assembles the composite view of one listing.
    ///
    /// The core row is fetched first and gates everything else: an unknown
    /// id fails with `NotFound` before any related table is read. The four
    /// related fetches then run concurrently, and the first failure among
    /// them fails the whole view.
    pub async fn get_listing(&self, listing_id: i32) -> Result<ListingDetail, ServiceError> {
        let core = self
            .repo
            .fetch_listing_core(listing_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Listing not found"))?;

        let (images, features, demographic_targets, urgency_settings) = futures::try_join!(
            self.repo.fetch_images(listing_id),
            self.repo.fetch_features(listing_id),
            self.repo.fetch_demographics(listing_id),
            self.repo.fetch_urgency(listing_id),
        )?;

        debug!(
            listing_id,
            images = images.len(),
            features = features.len(),
            has_demographics = demographic_targets.is_some(),
            has_urgency = urgency_settings.is_some(),
            "Assembled listing"
        );

        Ok(merge(core, images, features, demographic_targets, urgency_settings))
    }

    pub async fn list_listings(&self) -> Result<Vec<ListingSummary>, ServiceError> {
        Ok(self.repo.list_listings().await?)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.repo.list_categories().await?)
    }

    pub async fn create_listing(&self, listing: &NewListing) -> Result<i32, ServiceError> {
        let id = self.repo.create_listing(listing).await?;
        debug!(
            listing_id = id,
            images = listing.images.len(),
            features = listing.features.len(),
            "Created listing"
        );
        Ok(id)
    }

    pub async fn add_image(&self, image: &NewListingImage) -> Result<(), ServiceError> {
        Ok(self.repo.create_listing_image(image).await?)
    }

    pub async fn add_feature(&self, feature: &NewPropertyFeature) -> Result<(), ServiceError> {
        Ok(self.repo.create_property_feature(feature).await?)
    }

    pub async fn add_demographic_target(&self, target: &NewDemographicTarget) -> Result<(), ServiceError> {
        Ok(self.repo.create_demographic_target(target).await?)
    }

    pub async fn add_urgency_setting(&self, setting: &NewUrgencySetting) -> Result<(), ServiceError> {
        Ok(self.repo.create_urgency_setting(setting).await?)
    }

    pub async fn health_check(&self) -> Result<(), ServiceError> {
        Ok(self.repo.ping().await?)
    }
}

fn merge(
    core: ListingCore,
    mut images: Vec<ListingImage>,
    features: Vec<PropertyFeature>,
    demographic_targets: Option<DemographicTarget>,
    urgency_settings: Option<UrgencySetting>,
) -> ListingDetail {
    images.sort_by_key(|image| (image.display_order, image.id));

    ListingDetail {
        core,
        images,
        features,
        demographic_targets,
        urgency_settings,
    }
}
