//! Foundation utilities shared by the backend and applications

pub mod logging;
