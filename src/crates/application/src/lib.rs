pub mod artist;
pub mod error;
pub mod validation;
