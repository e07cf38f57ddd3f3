use app_state::AppSettings;
use axum::extract::FromRef;
use common_services::api::caption::service::CaptionService;
use common_services::stores::{HistoryStore, InMemoryHistoryStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiContext {
    pub settings: AppSettings,
    pub caption_service: CaptionService,
    pub history: Arc<dyn HistoryStore>,
}

impl ApiContext {
    /// Wires the caption service and a fresh in-memory history from settings.
    #[must_use]
    pub fn new(settings: AppSettings) -> Self {
        let history: Arc<dyn HistoryStore> =
            Arc::new(InMemoryHistoryStore::new(settings.history.capacity));
        Self::with_service(
            settings.clone(),
            CaptionService::new(&settings, history.clone()),
            history,
        )
    }

    /// The service and the handlers must share the same history store.
    #[must_use]
    pub fn with_service(
        settings: AppSettings,
        caption_service: CaptionService,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            settings,
            caption_service,
            history,
        }
    }
}

impl FromRef<ApiContext> for CaptionService {
    fn from_ref(state: &ApiContext) -> Self {
        state.caption_service.clone()
    }
}

impl FromRef<ApiContext> for Arc<dyn HistoryStore> {
    fn from_ref(state: &ApiContext) -> Self {
        state.history.clone()
    }
}
