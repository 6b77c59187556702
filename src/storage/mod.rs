pub mod db;
mod documents;
pub mod models;
mod tables;

pub use db::{Database, DatabaseError};
pub use tables::*;
