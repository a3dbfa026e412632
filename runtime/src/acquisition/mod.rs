// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Remote acquisition: page and probe requests, preview extraction, and
//! image downloads into managed storage.

pub mod fetcher;
pub mod http_client;
pub mod structured;
