//! HTTP surface of the calendar API.

pub mod auth;
pub mod dto;
mod handlers;
pub mod problem;
pub mod routes;
