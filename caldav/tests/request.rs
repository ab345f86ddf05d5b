// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Request building tests.

use radisync_caldav::{MultiStatusResponse, SyncCollectionRequest};

#[test]
fn request_sync_collection_builds_xml() {
    let xml = SyncCollectionRequest::new(Some("http://radicale.org/ns/sync/1f2e"))
        .build()
        .expect("Failed to build sync-collection XML");

    assert!(xml.contains("<D:sync-collection"));
    assert!(xml.contains("xmlns:D=\"DAV:\""));
    assert!(xml.contains("xmlns:C=\"urn:ietf:params:xml:ns:caldav\""));
    assert!(xml.contains("<D:sync-token>http://radicale.org/ns/sync/1f2e</D:sync-token>"));
    assert!(xml.contains("<D:sync-level>1</D:sync-level>"));
    assert!(xml.contains("<D:prop>"));
    assert!(xml.contains("<D:getetag/>"));
    assert!(xml.contains("<C:calendar-data/>"));
    assert!(xml.contains("</D:sync-collection>"));
}

#[test]
fn request_sync_collection_is_well_formed() {
    // The builder's output must be readable by the multistatus parser's XML
    // reader without errors, for both the baseline and incremental forms.
    for token in [None, Some("tok<&>")] {
        let xml = SyncCollectionRequest::new(token).build().unwrap();
        let parsed = MultiStatusResponse::from_xml(&xml).expect("request XML should be well formed");
        assert!(parsed.responses.is_empty());
    }
}
