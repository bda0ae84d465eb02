//! Deformable pipe
//!
//! A pipe bounded by pairs of top/bottom control points at shared x
//! positions. Each rail is a natural cubic spline through its control
//! points; width and flow velocity follow from the fitted rails.

pub mod spline;
pub mod control_point;
pub mod cross_section;
pub mod geometry;
pub mod flux_meter;

pub use spline::CubicSpline;
pub use control_point::{ControlPoint, PipeEnd, PipeSide};
pub use cross_section::CrossSection;
pub use geometry::{PipeConfig, PipeGeometry};
pub use flux_meter::FluxMeter;
