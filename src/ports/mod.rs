//! Port traits (interfaces to external collaborators).

pub mod config_port;
pub mod data_port;
pub mod report_port;
