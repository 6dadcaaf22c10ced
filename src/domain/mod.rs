pub mod business;
pub mod contact;
