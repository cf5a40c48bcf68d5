//! Application orchestration: state management, controller, network jobs
//! and input handling.

pub mod controller;
pub mod event;
pub mod handler;
pub mod net_runtime;
pub mod state;
