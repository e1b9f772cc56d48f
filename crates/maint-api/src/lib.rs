//! HTTP transport for the predictive maintenance service

pub mod api;
pub mod config;
