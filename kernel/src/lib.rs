pub mod database;
pub mod model;
