// Application state for HTTP handlers
use crate::application::catalog_service::CatalogService;
use crate::application::dashboard_service::DashboardService;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub catalog_service: CatalogService,
}
