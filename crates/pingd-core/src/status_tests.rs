// SPDX-License-Identifier: MIT

use super::*;

#[yare::parameterized(
    untested          = { Status::Untested, BucketClass::Untested },
    defunct           = { Status::Defunct, BucketClass::Defunct },
    active            = { Status::Active, BucketClass::Active },
    inactive_1        = { Status::Inactive1, BucketClass::Active },
    inactive_2        = { Status::Inactive2, BucketClass::Active },
    inactive_3        = { Status::Inactive3, BucketClass::Active },
    inactive_4        = { Status::Inactive4, BucketClass::Active },
    inactive_flagged  = { Status::InactiveFlagged, BucketClass::Active },
)]
fn bucket_mapping(status: Status, expected: BucketClass) {
    assert_eq!(status.bucket(), expected);
}

#[test]
fn only_flagged_silences_escalation() {
    for status in [
        Status::Untested,
        Status::Defunct,
        Status::Active,
        Status::Inactive1,
        Status::Inactive2,
        Status::Inactive3,
        Status::Inactive4,
    ] {
        assert!(!status.escalation_silenced(), "{status:?} should not be silenced");
    }
    assert!(Status::InactiveFlagged.escalation_silenced());
}
