// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Vitrine runtime library: link resolution, ingestion and publishing.
//!
//! This library crate exposes the pipeline, the REST router and the CLI
//! commands so the binary and the integration tests share them.

#![allow(clippy::new_without_default)]

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod feed;
pub mod ingest;
pub mod resolve;
pub mod rest;
