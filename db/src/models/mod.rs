pub mod performance_metrics_data;
pub mod performance_metrics_index;

pub use performance_metrics_data::Entity as PerformanceMetricsData;
pub use performance_metrics_index::Entity as PerformanceMetricsIndex;
