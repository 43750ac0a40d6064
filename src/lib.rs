//! Motormart - Vehicle marketplace prediction backend
//!
//! This crate implements the prediction side of a vehicle marketplace:
//! resolving free-form categorical inputs against the vocabularies the
//! trained encoders were fit on, assembling fixed-order feature vectors,
//! and serving price and brand/model predictions over REST.
//!
//! # Modules
//!
//! ## Core
//! - [`resolver`] - Vocabularies and fuzzy categorical resolution
//! - [`features`] - Derived-field rules and fixed-order feature rows
//! - [`predict`] - Prediction context, dispatch, price formatting
//!
//! ## Artifacts & Data
//! - [`model`] - Pre-trained tree-ensemble artifacts and versioned bundles
//! - [`dataset`] - Reference dataset: vocabularies, dropdowns, modal values
//!
//! ## Services
//! - [`server`] - REST API
//! - [`cli`] - Command-line interface

pub mod error;

pub mod features;
pub mod predict;
pub mod resolver;

pub mod dataset;
pub mod model;

pub mod cli;
pub mod server;

pub use error::{MotormartError, Result};
