pub mod auth;
pub mod category;
pub mod invoice;
pub mod product;
pub mod report;
pub mod stock;
pub mod supplier;
