pub mod category;
pub mod demographic_target;
pub mod listing;
pub mod listing_image;
pub mod property_feature;
pub mod urgency_setting;
pub mod user;

pub use category::Category;
pub use demographic_target::{DemographicTarget, DemographicTargetInput, NewDemographicTarget};
pub use listing::{Listing, ListingCore, ListingDetail, ListingSummary, NewListing};
pub use listing_image::{ListingImage, ListingImageInput, NewListingImage};
pub use property_feature::{NewPropertyFeature, PropertyFeature, PropertyFeatureInput};
pub use urgency_setting::{NewUrgencySetting, UrgencySetting, UrgencySettingInput};
pub use user::{Credentials, NewUser, User};
