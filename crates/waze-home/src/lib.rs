//! waze-home - Get the fastest route between home and work
//!
//! Library crate backing the `waze-home` binary. The interesting piece is
//! the route provider adapter ([`adapter::RouteAdapter`]): it calls the
//! external routing provider through the [`provider::RouteProvider`] seam
//! and always produces a well-formed [`route::RouteResult`], substituting
//! deterministic mock data whenever the provider fails.

pub mod adapter;
pub mod config;
pub mod provider;
pub mod report;
pub mod route;
