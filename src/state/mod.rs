pub mod app_settings;
pub mod app_state;
pub mod auth;
pub mod entities;
pub mod forms;
pub mod matches;
pub mod messages;
pub mod refresher;
pub mod roster;
pub mod sagas;
pub mod scoreboard;
pub mod scorecard;
pub mod scoring;
pub mod series;
pub mod store;
