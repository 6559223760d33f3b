pub mod api;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod gazetteer;
pub mod render;
pub mod resolver;
pub mod server;
