//! # ORSI Rust Backend
//!
//! Operating-room scheduling and facility analytics engine.
//!
//! This crate provides a Rust backend for the Operating Room Scheduling
//! Intelligence (ORSI) system, offering parsing, validation, and analysis
//! of surgical case datasets. The backend exposes a REST API via Axum for
//! the React frontend.
//!
//! ## Features
//!
//! - **Data Loading**: Parse case datasets from JSON format
//! - **Financial Analytics**: Benchmark-based projections, projected-vs-actual
//!   comparisons, cost breakdowns, full-day forecasts
//! - **Pattern Detection**: Classify weekly/day-of-week flag rollups into
//!   named patterns with severity tiers
//! - **Trend Analysis**: Weekly volume trends and volume-vs-utilization
//!   divergence classification
//! - **Timeline Layout**: Bracket/lane packing for paired case milestones
//! - **Calendar Engine**: US federal holiday computation with observed-date
//!   shifts
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) for API responses
//! - [`algorithms`]: Shared statistical routines
//! - [`db`]: Repository pattern and persistence layer
//! - [`models`]: Input parsing and facility settings
//! - [`routes`]: Route-specific data types
//! - [`services`]: Analytics core and orchestration
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! Every analytics computation is a stateless transform over rows the
//! caller already fetched; the services hold no state across calls and can
//! run concurrently without coordination.

pub mod api;

pub mod algorithms;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
