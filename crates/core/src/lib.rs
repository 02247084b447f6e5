//! Domain building blocks shared by the database and API crates.

pub mod error;
pub mod follow;
pub mod forms;
pub mod media;
pub mod pagination;
pub mod site;
pub mod types;
