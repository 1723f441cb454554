pub mod project;
pub mod setup;
pub mod suggest;
pub mod ui;
