//! Interactive animated gradient background, rendered on the CPU.
//!
//! A pointer trail ([`trail::TrailBuffer`]) is painted into a small raster
//! every frame; the procedural [`gradient::GradientField`] samples that raster
//! to warp its coordinates, and [`host::ViewportHost`] sequences the two and
//! owns the surface. The window in [`draw`] is only one possible host.

pub mod config;
pub mod draw;
pub mod error;
pub mod export;
pub mod gradient;
pub mod host;
pub mod kernel;
pub mod logging;
pub mod trail;
pub mod types;

pub use error::Error;
