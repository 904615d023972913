// Aggregates all former standalone integration tests as modules.
mod config;
mod menus;
mod navigation;
