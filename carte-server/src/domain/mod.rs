//! Domain types for the stop map.
//!
//! Stops and routes as served by the SOTRACO API. Stops are fully typed;
//! routes are carried as opaque JSON since nothing reads their fields yet.

mod route;
mod stop;

pub use route::Route;
pub use stop::{
    COLOR_COMPLETE, COLOR_NONE, COLOR_PARTIAL, Coordinates, Equipment, EquipmentLevel,
    InvalidRouteId, RouteId, Stop, StopId,
};
