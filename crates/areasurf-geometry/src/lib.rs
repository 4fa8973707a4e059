//! Boundary geometry: curves, closed loops, plane fitting and the checks that
//! turn a bag of boundary curves into an outer loop plus holes.

pub mod curve;
pub mod loops;
pub mod plane;
pub mod polygon;
pub mod validate;

use thiserror::Error;

pub use cgmath::{EuclideanSpace, InnerSpace, MetricSpace};

pub type Point2 = cgmath::Point2<f64>;
pub type Point3 = cgmath::Point3<f64>;
pub type Vector3 = cgmath::Vector3<f64>;

pub use curve::Curve;
pub use loops::{Loop, LoopGrouping, group_into_loops};
pub use plane::PlaneFit;
pub use validate::{BoundaryLoops, Verdict, validate_boundary};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("no closed loop among {curves} curves ({open_chains} open chains)")]
    NoClosedLoop { curves: usize, open_chains: usize },
    #[error("points deviate {deviation} from the fitted plane (tolerance {tolerance})")]
    NotCoplanar { deviation: f64, tolerance: f64 },
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
