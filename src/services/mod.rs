pub mod catalog_service;
pub mod lobby;
pub mod notification_service;
pub mod pricing_service;
pub mod quote_service;
pub mod reconciliation_service;
pub mod references;
pub mod reservation_service;
pub mod wetravel;
