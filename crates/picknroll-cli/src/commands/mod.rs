pub mod config;
pub mod roll;
pub mod scan;
