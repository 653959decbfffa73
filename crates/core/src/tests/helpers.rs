// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bms_interop_domain::UserInfo;

pub fn create_test_user(name: &str, type_code: i32) -> UserInfo {
    UserInfo {
        user_name: name.to_string(),
        user_id: String::from("17"),
        installation_id: 1,
        status: 1,
        access: 30,
        type_code,
        person_id: 4,
        access_date: Some(String::from("20140101")),
    }
}
