// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod metric_client;
pub mod rpc_client;
pub mod sqlite_repository;
