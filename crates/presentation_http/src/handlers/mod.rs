//! HTTP request handlers

pub mod demo;
pub mod health;
pub mod history;
pub mod tags;
