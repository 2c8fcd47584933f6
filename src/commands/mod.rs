pub mod kubectl;
pub mod nodes;
pub mod pods;
pub mod tables;
