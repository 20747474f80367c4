pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod notifications;
pub mod service;
pub mod web;
