#![doc = include_str!("../README.md")]

pub mod app;
pub mod bootstrap;
pub mod component;
pub mod firestore;
pub mod logger;
pub mod platform;

#[cfg(test)]
pub(crate) mod test_support;
