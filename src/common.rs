pub mod decimal;
pub mod error;
pub mod pagination;
pub mod response;
pub mod validation;
