use std::sync::Arc;

use crate::database::repository::{ListingRepository, UserRepository};
use crate::services::{ListingService, UserService};

/// Shared handler state. Services hold the repository, which holds the pool.
#[derive(Clone)]
pub struct AppState {
    pub listings: ListingService,
    pub users: UserService,
}

impl AppState {
    pub fn new<R>(repo: Arc<R>) -> Self
    where
        R: ListingRepository + UserRepository + 'static,
    {
        Self {
            listings: ListingService::new(repo.clone()),
            users: UserService::new(repo),
        }
    }
}
