pub mod app;

pub use app::make_test_app;
pub use services::test_support::{StubResponse, spawn_upstream};
