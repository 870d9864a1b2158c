pub mod given;
pub mod then;
pub mod when;
