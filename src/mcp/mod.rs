pub mod handler;
pub mod protocol;
pub mod registry;
pub mod tools;
