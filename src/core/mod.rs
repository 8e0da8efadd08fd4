//! Core domain types shared by the access-control and notification layers

pub mod models;
