use std::sync::Arc;

use crate::rate_limit::{TokenBucket, GLOBAL_BURST, GLOBAL_RATE, STORE_BURST, STORE_RATE};
use crate::storage::ImageStore;

#[derive(Clone)]
pub struct AppState {
    pub images: Arc<dyn ImageStore>,
    pub limits: Arc<Limits>,
}

/// Request budgets shared by every connection.
pub struct Limits {
    pub global: TokenBucket,
    pub store: TokenBucket,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            global: TokenBucket::new(GLOBAL_RATE, GLOBAL_BURST),
            store: TokenBucket::new(STORE_RATE, STORE_BURST),
        }
    }
}

impl AppState {
    pub fn new(images: Arc<dyn ImageStore>) -> Self {
        Self::with_limits(images, Limits::default())
    }

    pub fn with_limits(images: Arc<dyn ImageStore>, limits: Limits) -> Self {
        Self {
            images,
            limits: Arc::new(limits),
        }
    }
}
