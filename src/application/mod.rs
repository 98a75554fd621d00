// Application layer - Use cases and seams
pub mod dashboard_service;
pub mod metric_repository;
pub mod metric_service;
pub mod metric_source;
