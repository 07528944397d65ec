pub mod delivery;
pub mod driver;
pub mod request;
pub mod vehicle;
