pub mod repository;

pub mod config;
