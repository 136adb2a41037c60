pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod gate;
pub mod router;
pub mod server;
