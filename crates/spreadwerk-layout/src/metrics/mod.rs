// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Metrics module — decode a page image and measure the scalar features the
// classifier works from.

pub mod extract;
mod gray;

pub use extract::MetricsExtractor;
