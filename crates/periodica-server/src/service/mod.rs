//! Business services

pub mod element;
