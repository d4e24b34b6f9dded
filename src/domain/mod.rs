pub mod input;
pub mod ore;
