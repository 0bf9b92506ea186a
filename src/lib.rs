pub mod app;
pub mod cli;
pub mod context;
pub mod logging;
pub mod markup;
pub mod models;
pub mod repository;
pub mod rest;
pub mod store;
