pub mod calendar;
pub mod check;
pub mod config;
pub mod data;
pub mod stats;
