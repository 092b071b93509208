pub mod auth;
pub mod invoice_service;
pub mod report_service;
