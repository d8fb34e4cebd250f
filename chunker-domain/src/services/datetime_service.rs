// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Timestamp Rounding Service
//!
//! FAT32 rounds file times up to the next multiple of 2 seconds, the least
//! accurate granularity of any filesystem this engine targets. Rounding
//! every timestamp to that granularity before comparison keeps version
//! ordering stable across nodes with differently-grained filesystems.

/// Rounds a timestamp up to the next even integer second. `ts_round(0) == 0`.
pub fn ts_round(seconds: f64) -> i64 {
    let int_time = seconds.ceil() as i64;
    if int_time % 2 != 0 {
        int_time + 1
    } else {
        int_time
    }
}
