//! Process environment helpers.

pub mod environment;
