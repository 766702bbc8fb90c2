pub mod sanitize;
pub mod validation;
