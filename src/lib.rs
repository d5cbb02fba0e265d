//! Inkshelf - a blog and library catalog REST service
//!
//! This library provides the core functionality for the Inkshelf service.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
