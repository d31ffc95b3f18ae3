pub mod catalog;
pub mod config;
pub mod exec;
pub mod fonts;
pub mod icons;
pub mod input;
pub mod logging;
pub mod native;
pub mod render;
pub mod selection;
pub mod session;
