pub mod m202410010001_create_performance_metrics_index;
pub mod m202410010002_create_performance_metrics_data;
