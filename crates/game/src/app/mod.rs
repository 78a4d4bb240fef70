mod bootstrap;
mod config;
mod controls;
mod loop_runner;
mod panels;
mod session;

pub(crate) use bootstrap::build_app;
pub(crate) use loop_runner::run;
