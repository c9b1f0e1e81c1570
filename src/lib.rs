#![allow(clippy::too_many_arguments, clippy::type_complexity)]

pub mod error;
pub mod validation;
pub mod model;
pub mod db;
pub mod ops;
pub mod queries;
pub mod migrate;
pub mod config;
pub mod logging;
pub mod args;
pub mod api;
pub mod cli;
