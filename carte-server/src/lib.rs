//! SOTRACO stop map server.
//!
//! Hosts a map of the Ouagadougou bus network: stops fetched from the
//! SOTRACO API are drawn as circle markers colored by equipment, can be
//! filtered by route, and the whole map state can be exported as JSON.

pub mod api;
pub mod config;
pub mod domain;
pub mod map;
pub mod web;
pub mod widget;
