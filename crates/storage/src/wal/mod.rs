// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only operation log behind [`WalPersistence`](crate::WalPersistence).
//!
//! Each line of `wal.jsonl` is one [`WalEntry`]: a whole batch with a CRC32
//! over its operations. Replaying the verified prefix rebuilds the
//! collections. Appends are fsync'd before they return.

pub mod entry;
pub mod reader;
pub mod writer;

pub use entry::WalEntry;
pub use reader::{WalCorruption, WalEntryIter, WalReader, WalValidation};
pub use writer::WalWriter;
