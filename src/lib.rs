//! Task list REST API: actix-web handlers over a MongoDB or in-memory task store.

pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod mapper;
pub mod models;
pub mod repository;
pub mod service;
pub mod task;
pub mod validation;
