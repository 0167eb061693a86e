// src/blockchain/mod.rs

pub mod client;
pub use client::AdamikClient;

pub mod models;
pub mod services;
