pub mod access;
pub mod bind;
pub mod cascade;
pub mod error;
pub mod ident;
pub mod identity;
pub mod input;
pub mod model;
pub mod security;
pub mod server;
pub mod service;
pub mod store;
pub mod view;
