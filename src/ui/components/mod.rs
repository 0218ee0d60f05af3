pub mod coverage_meter;
pub mod kpi_card;
pub mod order_table;
pub mod shipping_options;
pub mod status_badge;
pub mod toast;
