pub mod auth;
pub mod categories;
pub mod products;
pub mod purchases;
pub mod reports;
pub mod sales;
pub mod stock;
pub mod suppliers;
