// src/models/mod.rs

pub mod category;
pub mod participant;
pub mod question;
pub mod quiz_config;
