pub mod config;
pub mod content;
pub mod db;
pub mod filters;
pub mod handlers;
pub mod paths;
pub mod routes;
pub mod state;

#[cfg(test)]
pub mod testing;
