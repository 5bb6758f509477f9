//! Integration test suite modules

mod config_file;
mod driver;
mod host_messages;
mod recall;
mod shortcuts;
mod spa_navigation;
