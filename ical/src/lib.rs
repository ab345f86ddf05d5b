// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse and compose the iCalendar (RFC 5545) subset used for event synchronization.
//!
//! The crate is pure: no I/O, no logging. It turns `calendar-data` bodies into
//! [`CalendarEvent`] records and turns event data back into single-event
//! documents whose timed values are always normalized to UTC.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

pub mod datetime;
mod error;
mod event;
pub mod formatter;
pub mod syntax;
pub mod text;

pub use crate::datetime::{DateValue, zoned_to_utc};
pub use crate::error::IcalError;
pub use crate::event::{CalendarEvent, ParsedCalendar, SyncResult, parse_calendar, parse_events};
pub use crate::formatter::{EventDocument, PRODUCT_ID};
