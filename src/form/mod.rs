pub mod controller;
pub mod fields;
pub mod render;
