//! # portfolio-search
//!
//! Search API and subdomain routing for a personal portfolio site. Queries
//! are answered by a hosted semantic index and re-ranked locally with
//! deterministic keyword rules.
//!
//! ## Architecture
//!
//! ```text
//!                  ┌───────────────────────┐
//!                  │  POST /api/search     │
//!                  │  { "query": "..." }   │
//!                  └───────────┬───────────┘
//!                              │ non-empty after trim, else 400
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │  Semantic index       │
//!                  │  result.hits or       │
//!                  │  results.hits         │
//!                  └───────────┬───────────┘
//!                              │ upstream failure → 500
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │  Boosting             │
//!                  │  title match  +0.30   │
//!                  │  keyword      +0.05/t │
//!                  │  type         +0.15   │
//!                  │  status       +0.05   │
//!                  └───────────┬───────────┘
//!                              │
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │  Filter ≥ 0.1, top 5  │
//!                  └───────────┬───────────┘
//!                              │ empty → 200 with advisory
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │  { "results": [...] } │
//!                  └───────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the index, ranking weights and site
//! - [`models`] - `SearchHit`, its typed metadata, request/response types
//! - [`error`] - `SearchError` and its JSON/HTTP mapping
//! - [`retrieval`] - Index client and dual-envelope response normalization
//! - [`ranking`] - Boosting rules, similarity floor and truncation
//! - [`routing`] - Research/main context classification and path rewriting middleware
//! - [`readiness`] - Bounded polling with an assume-ready fallback
//! - [`api`] - Axum handlers and server assembly
//! - [`state`] - Shared application state

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod ranking;
pub mod readiness;
pub mod retrieval;
pub mod routing;
pub mod state;
