pub mod catalog;
pub mod error;
pub mod scene;
pub mod selection;
