pub mod auth;
pub mod chain;
pub mod deliveries;
pub mod donations;
pub mod feeding_needs;
pub mod food_packs;
pub mod impact;
pub mod users;
pub mod verifications;
