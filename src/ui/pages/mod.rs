pub mod dashboard;
pub mod orders;
pub mod settings;

pub use dashboard::DashboardPage;
pub use orders::OrdersPage;
pub use settings::SettingsPage;
