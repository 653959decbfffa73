// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidId(String::from("abc"));
    assert_eq!(format!("{err}"), "Invalid entity id: 'abc'");

    let err: DomainError = DomainError::UnknownEntity(String::from("specimen"));
    assert_eq!(format!("{err}"), "Unknown entity name: 'specimen'");
}
