//! Umbrella crate that re-exports the `arbor-*` building blocks.
//!
//! This crate is intended as a convenient entrypoint: the kernel under
//! [`core`], the built-in policies under [`utility`], and the debug tooling
//! under [`tools`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use arbor_core as core;

#[cfg(feature = "utility")]
#[cfg_attr(docsrs, doc(cfg(feature = "utility")))]
pub use arbor_utility as utility;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use arbor_tools as tools;
