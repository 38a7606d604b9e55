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
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![warn(unused_results)]
#![warn(unused_qualifications)]
// Cast hygiene
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
// Graphics math compares floats against exact constants and casts freely
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]

//! Real-time viewport controller for interactive 3D scene viewers.
//!
//! Vantage owns the camera, the frame loop, render-resolution budgeting and
//! the attach/detach lifecycle of renderable models. Geometry decoding and
//! network access stay outside: models arrive through a [`model::ModelLoader`]
//! and frames leave through a [`render::FrameRenderer`].
//!
//! # Key entry points
//!
//! - [`viewport::ViewportController`] - the top-level controller
//! - [`viewport::create_viewport_controller`] - validated construction
//! - [`options::ViewportOptions`] - runtime configuration (camera, animation,
//!   resize budget, controls, key bindings)
//! - [`camera::animator::CameraAnimator`] - eased camera transitions
//!
//! # Frame loop
//!
//! The host calls [`viewport::ViewportController::tick`] once per
//! vsync-aligned callback. A tick advances any camera animation, consumes
//! model change signals, adapts the render resolution, and renders a frame
//! only if one of those raised the redraw flag. Otherwise the tick is a
//! render-skip and the previous frame stays on screen.

pub mod camera;
pub mod error;
pub mod gpu;
pub mod input;
pub mod math;
pub mod model;
pub mod options;
pub mod render;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
pub mod viewport;

pub use error::{UnsupportedOperation, ViewportError};
pub use input::{InputEvent, MouseButton};
pub use model::{ModelHandle, ModelKind};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
pub use viewport::{create_viewport_controller, ViewportController};
