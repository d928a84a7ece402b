// src/lib.rs

//! newswatch: emails posts newly published on watched news pages.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
