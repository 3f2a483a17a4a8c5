//! Rendering for the composed scene.
//!
//! A single instanced matcap pipeline draws every ring and the centerpiece.

pub mod matcap;
pub(crate) mod pipeline_util;
