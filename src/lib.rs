// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// GPU / graphics allowances: casts between index and float types are
// intentional throughout mesh generation.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]

//! Concentric instanced rings of meshes, rendered with matcap shading on
//! wgpu.
//!
//! A session loads a handful of OBJ meshes on background threads, waits for
//! all of them behind a [`assets::LoadBarrier`], then composes ten rings of
//! instanced copies around a random centerpiece and renders them every frame
//! through a damped orbit camera.
//!
//! # Key entry points
//!
//! - [`layout`] - ring derivation formulas and per-instance transforms
//! - [`scene::SceneComposer`] - random geometry/color selection producing a
//!   [`scene::ComposedScene`]
//! - [`scene::SceneSession`] - GPU-side session with `init` / `run_frame` /
//!   `teardown`
//! - [`render_loop::RenderLoop`] - cancellable repeating frame task
//! - `Viewer` (feature `viewer`) - standalone winit window
//!
//! Everything except the session, renderer and viewer is GPU-free and can be
//! exercised headless.

pub mod assets;
pub mod camera;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod layout;
pub mod options;
pub mod render_loop;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
mod viewer;

pub use error::RingfieldError;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
