pub mod fields;
pub mod session;
pub mod store;
