//! Discovery of DRAGEN tumor/normal + normal run outputs.
//!
//! A [`project::Project`] is built from one or more run descriptions. Each
//! description becomes a [`batch::Batch`] holding the resolved variant-call
//! files and a tumor and a normal [`sample::Sample`] with their alignment and
//! QC metric paths.

pub mod batch;
pub mod config;
pub mod domain;
pub mod error;
pub mod fs_util;
pub mod layout;
pub mod output;
pub mod project;
pub mod sample;
