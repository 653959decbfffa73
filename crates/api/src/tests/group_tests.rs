// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::json;

use super::helpers::{
    create_test_database, create_test_fixture, create_test_session, login_admin, password_params,
};
use crate::{ApiError, JsonResponseBuilder, SessionExpiryOption};

#[test]
fn test_admin_owns_group() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);
    let session = login_admin(&database, "s1");

    let info = database.get_system_group_info(&session).unwrap();
    assert_eq!(info.group_id, "group-1");
    assert_eq!(info.group_name, "SYSTEM ADMINISTRATOR");
    assert!(info.group_owner);
}

#[test]
fn test_breeder_does_not_own_group() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);
    database
        .do_login(
            "s1",
            "bob",
            SessionExpiryOption::default(),
            &password_params("hunter2"),
        )
        .unwrap();

    let info = database
        .get_system_group_info(&create_test_session("s1"))
        .unwrap();
    assert_eq!(info.group_name, "BREEDER");
    assert!(!info.group_owner);
}

#[test]
fn test_undefined_user_type_is_missing_reference_data() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);
    database
        .do_login(
            "s1",
            "carol",
            SessionExpiryOption::default(),
            &password_params("pw"),
        )
        .unwrap();

    let result = database.get_system_group_info(&create_test_session("s1"));
    assert!(matches!(result, Err(ApiError::MissingReferenceData(_))));
}

#[test]
fn test_group_info_requires_login() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);

    let result = database.get_system_group_info(&create_test_session("nobody"));
    assert_eq!(result, Err(ApiError::NotLoggedIn));
}

#[test]
fn test_list_group() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);
    let session = login_admin(&database, "s1");

    let mut builder = JsonResponseBuilder::new();
    database.perform_list_group(&session, &mut builder).unwrap();

    assert_eq!(
        builder.into_json(),
        json!({
            "RecordMeta": [{ "TagName": "SystemGroup" }],
            "SystemGroup": [{
                "SystemGroupId": "10",
                "SystemGroupName": "ADMIN",
                "SystemGroupDescription": "SYSTEM ADMINISTRATOR"
            }]
        })
    );
}

#[test]
fn test_list_group_with_undefined_type() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);
    database
        .do_login(
            "s1",
            "carol",
            SessionExpiryOption::default(),
            &password_params("pw"),
        )
        .unwrap();

    let mut builder = JsonResponseBuilder::new();
    database
        .perform_list_group(&create_test_session("s1"), &mut builder)
        .unwrap();

    let document = builder.into_json();
    assert_eq!(document["SystemGroup"][0]["SystemGroupId"], "0");
    assert_eq!(document["SystemGroup"][0]["SystemGroupName"], "Unknown-99");
}

#[test]
fn test_list_all_groups() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);
    let session = login_admin(&database, "s1");

    let mut builder = JsonResponseBuilder::new();
    database.perform_list_all_group(&session, &mut builder).unwrap();

    let document = builder.into_json();
    let ids: Vec<&str> = document["SystemGroup"]
        .as_array()
        .unwrap()
        .iter()
        .map(|group| group["SystemGroupId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["10", "11"]);
}

#[test]
fn test_list_all_groups_requires_login() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);

    let mut builder = JsonResponseBuilder::new();
    let result = database.perform_list_all_group(&create_test_session("s1"), &mut builder);
    assert_eq!(result, Err(ApiError::NotLoggedIn));
}

#[test]
fn test_list_field_needs_no_login() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);

    let mut builder = JsonResponseBuilder::new();
    database
        .perform_list_field(&create_test_session("nobody"), "Genotype", &mut builder)
        .unwrap();

    let document = builder.into_json();
    assert_eq!(document["RecordMeta"], json!([{ "TagName": "SCol" }]));

    let columns = document["SCol"].as_array().unwrap();
    assert_eq!(columns.len(), 15);
    assert_eq!(
        columns[0],
        json!({
            "Name": "GenotypeId",
            "DataType": "integer",
            "Required": "1",
            "ColSize": "",
            "CanFilter": "1"
        })
    );

    let genus_name = columns.iter().find(|c| c["Name"] == "GenusName").unwrap();
    assert_eq!(genus_name["Required"], "0");
    assert_eq!(genus_name["ColSize"], "32");
    assert_eq!(genus_name["CanFilter"], "0");
}

#[test]
fn test_list_field_unknown_table() {
    let fixture = create_test_fixture();
    let database = create_test_database(&fixture);

    let mut builder = JsonResponseBuilder::new();
    let result =
        database.perform_list_field(&create_test_session("s1"), "specimen", &mut builder);
    assert_eq!(result, Err(ApiError::UnknownTable(String::from("specimen"))));
}
