// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Spreadwerk.

use std::time::Duration;

use thiserror::Error;

/// Top-level error type for all Spreadwerk operations.
#[derive(Debug, Error)]
pub enum SpreadwerkError {
    // -- Image errors --
    #[error("image decoding failed: {0}")]
    Decode(String),

    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    // -- Caller contract --
    #[error("page/class length mismatch: {pages} pages but {classes} classes")]
    LengthMismatch { pages: usize, classes: usize },

    #[error("page not found: {0}")]
    PageNotFound(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Scheduling --
    #[error("worker pool could not be built: {0}")]
    WorkerPool(String),

    #[error("chapter worker failed: {0}")]
    Worker(String),

    #[error("chapter analysis exceeded deadline of {0:?}")]
    Timeout(Duration),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SpreadwerkError>;
