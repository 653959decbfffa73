// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::json;

use crate::{DalResponseBuilder, JsonResponseBuilder};

#[test]
fn test_empty_document_has_record_meta() {
    let builder = JsonResponseBuilder::new();
    assert_eq!(builder.into_json(), json!({ "RecordMeta": [] }));
}

#[test]
fn test_section_without_elements_is_an_empty_array() {
    let mut builder = JsonResponseBuilder::new();
    builder.add_response_meta("SCol");
    assert_eq!(
        builder.into_json(),
        json!({ "RecordMeta": [{ "TagName": "SCol" }], "SCol": [] })
    );
}

#[test]
fn test_elements_collect_under_their_tag() {
    let mut builder = JsonResponseBuilder::new();
    builder.add_response_meta("SystemGroup");
    builder.start_tag("SystemGroup");
    builder.attribute("SystemGroupId", "10");
    builder.attribute("SystemGroupName", "ADMIN");
    builder.end_tag();
    builder.start_tag("SystemGroup");
    builder.attribute("SystemGroupId", "11");
    builder.end_tag();

    assert_eq!(
        builder.into_json(),
        json!({
            "RecordMeta": [{ "TagName": "SystemGroup" }],
            "SystemGroup": [
                { "SystemGroupId": "10", "SystemGroupName": "ADMIN" },
                { "SystemGroupId": "11" }
            ]
        })
    );
}

#[test]
fn test_attributes_outside_an_element_are_dropped() {
    let mut builder = JsonResponseBuilder::new();
    builder.add_response_meta("SCol");
    builder.attribute("Name", "ignored");
    builder.start_tag("SCol");
    builder.attribute("Name", "genus_id");

    // Never closed.
    assert_eq!(
        builder.into_json(),
        json!({ "RecordMeta": [{ "TagName": "SCol" }], "SCol": [] })
    );
}
