// Application layer - Use cases and the data-access seam
pub mod aggregate;
pub mod catalog_service;
pub mod dashboard_service;
pub mod ticket_repository;
