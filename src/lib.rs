// src/lib.rs
pub mod analysis;
pub mod change;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exit;
pub mod filter;
pub mod gav;
pub mod graph;
pub mod logging;
pub mod pom;
pub mod reporting;
pub mod session;
pub mod store;
