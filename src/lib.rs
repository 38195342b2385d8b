//! Lookup Portal Library
//!
//! Looks up people by mobile number or national ID and vehicles by
//! registration number against third-party record services, and normalizes
//! the answers into a single result envelope.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Normalization, orchestration and result shaping.
//! - `integrations`: Upstream service clients.
//! - `config`: Configuration management.
//! - `envelope`: Result envelope builder (field alias resolution).
//! - `errors`: Error handling types.
//! - `gateway_client`: Shared JSON-over-HTTP upstream client.
//! - `handlers`: HTTP request handlers.
//! - `models`: Envelope, outcome and request models.
//! - `normalizer`: Input normalization per search type.
//! - `orchestrator`: Lookup orchestration.
//! - `routes`: Router construction.
//! - `services`: User-record, vehicle-detail and vehicle-mobile clients.
//! - `session`: Last-submitted-wins search state.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod envelope;
pub mod errors;
pub mod gateway_client;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod orchestrator;
pub mod routes;
pub mod services;
pub mod session;
