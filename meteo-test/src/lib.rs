#![doc = include_str!("../README.md")]

pub mod core;
pub mod steps;

pub use crate::core::MeteoWorld;
