//! Isometric network-diagram engine and its canvas component.
//!
//! The engine modules are pure and do not touch the DOM: projection and
//! camera math, cuboid geometry, face culling and painter's ordering,
//! Manhattan edge routing, group bounds, and the interaction controller.
//! [`scene::build_frame`] turns a [`DiagramState`] into a list of draw
//! commands that the canvas adapter replays each animation frame.

pub mod color;
mod component;
pub mod config;
pub mod controller;
pub mod depth;
pub mod geometry;
pub mod group;
pub mod projection;
mod render;
pub mod routing;
pub mod scene;
pub mod state;
pub mod types;

pub use component::IsometricCanvas;
pub use types::{DiagramEvent, Edge, Node, NodeKind, TopologyData};
