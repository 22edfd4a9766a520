pub mod authenticate;
pub mod collaborator;
pub mod config;
pub mod install;
pub mod repository;
pub mod status;
pub mod template;
pub mod update;
