// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Radisync - keep a `CalDAV` collection and a Google calendar in sync

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    radisync_cli::run().await
}
