pub mod animation;
pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod forecast;
pub mod icons;
pub mod view;
pub mod weather;
