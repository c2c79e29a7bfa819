use std::{sync::Arc, time::Duration};

use ragroute_config::Config;
use ragroute_service::RagService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<RagService>,
}
impl AppState {
	pub fn new(config: Config) -> Self {
		Self::with_service(RagService::new(config))
	}

	pub fn with_service(service: RagService) -> Self {
		Self { service: Arc::new(service) }
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.service.cfg.service.request_timeout_ms)
	}
}
