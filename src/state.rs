use crate::rack::WeeklyRack;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub rack: Arc<WeeklyRack>,
}

impl AppState {
    pub fn new(rack: WeeklyRack) -> Self {
        Self {
            rack: Arc::new(rack),
        }
    }
}
