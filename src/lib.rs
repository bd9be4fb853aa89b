#![deny(warnings, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub(crate) mod api;
pub mod app;
pub mod catalog;
pub mod category;
pub mod classifier;
pub mod clients;
pub mod config;
pub mod observability;
pub mod orchestrator;
pub mod recognition;
