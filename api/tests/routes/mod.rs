mod data_test;
mod health_test;
