// Domain layer - Core value types
pub mod chart;
pub mod metric;
