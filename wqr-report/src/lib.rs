//! Report model, pagination, and dual rendering.
//!
//! This crate provides:
//! - `model`: the `ReportModel` page tree built from normalized series and
//!   compliance rollups
//! - `paginate`: pure page-count and page-assignment functions
//! - `view_state`: the explicit per-report chart visibility object
//! - `render`: the shared page renderer both surfaces consume
//! - `chart`: plotters SVG time-series charts
//! - `interactive`: the navigable surface and its snapshot store
//! - `export`: the fixed export document, assembled page by page with
//!   bounded-wait chart capture and placeholder degradation

pub mod chart;
pub mod export;
pub mod interactive;
pub mod model;
pub mod paginate;
pub mod render;
pub mod view_state;
