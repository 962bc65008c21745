//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate grid construction and snapshot persistence into the
//!   calendar use-case API.
//! - Keep UI surfaces decoupled from storage details.

pub mod calendar_service;
