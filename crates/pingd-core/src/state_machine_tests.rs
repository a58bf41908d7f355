// SPDX-License-Identifier: MIT

use super::*;

#[yare::parameterized(
    untested_alive   = { Status::Untested, BucketClass::Untested, true, Status::Active },
    untested_dead    = { Status::Untested, BucketClass::Untested, false, Status::Defunct },
    defunct_alive    = { Status::Defunct, BucketClass::Defunct, true, Status::Active },
    defunct_dead     = { Status::Defunct, BucketClass::Defunct, false, Status::Defunct },
    active_stays     = { Status::Active, BucketClass::Active, true, Status::Active },
    inactive1_stays  = { Status::Inactive1, BucketClass::Active, true, Status::Active },
    flagged_stays    = { Status::InactiveFlagged, BucketClass::Active, true, Status::Active },
    active_to_1      = { Status::Active, BucketClass::Active, false, Status::Inactive1 },
    i1_to_i2         = { Status::Inactive1, BucketClass::Active, false, Status::Inactive2 },
    i2_to_i3         = { Status::Inactive2, BucketClass::Active, false, Status::Inactive3 },
    i3_to_flagged    = { Status::Inactive3, BucketClass::Active, false, Status::InactiveFlagged },
    i4_to_flagged    = { Status::Inactive4, BucketClass::Active, false, Status::InactiveFlagged },
    flagged_stays_dead = { Status::InactiveFlagged, BucketClass::Active, false, Status::InactiveFlagged },
)]
fn transition_table(current: Status, bucket: BucketClass, alive: bool, expected: Status) {
    let t = transition(current, bucket, alive);
    assert_eq!(t.new_status, expected);
}

#[yare::parameterized(
    active_to_inactive_1    = { Status::Active, Status::Inactive1 },
    inactive_1_to_2         = { Status::Inactive1, Status::Inactive2 },
    inactive_2_to_3         = { Status::Inactive2, Status::Inactive3 },
)]
fn early_escalation_steps_do_not_notify(current: Status, expected: Status) {
    let t = transition(current, BucketClass::Active, false);
    assert_eq!(t.new_status, expected);
    assert!(!t.notify);
}

#[yare::parameterized(
    from_inactive_3 = { Status::Inactive3 },
    from_inactive_4 = { Status::Inactive4 },
)]
fn escalation_to_flagged_notifies_exactly_once(current: Status) {
    let t = transition(current, BucketClass::Active, false);
    assert_eq!(t.new_status, Status::InactiveFlagged);
    assert!(t.notify);
}

#[test]
fn already_flagged_never_notifies_again() {
    let t = transition(Status::InactiveFlagged, BucketClass::Active, false);
    assert_eq!(t.new_status, Status::InactiveFlagged);
    assert!(!t.notify);
}

#[test]
fn recovery_from_active_bucket_does_not_notify() {
    let t = transition(Status::InactiveFlagged, BucketClass::Active, true);
    assert_eq!(t.new_status, Status::Active);
    assert!(!t.notify);
}

#[test]
fn defunct_recovery_does_not_notify() {
    let t = transition(Status::Defunct, BucketClass::Defunct, true);
    assert_eq!(t.new_status, Status::Active);
    assert!(!t.notify);
}

#[yare::parameterized(
    untested_alive_in_active = { Status::Untested, true },
    untested_dead_in_active  = { Status::Untested, false },
    defunct_alive_in_active  = { Status::Defunct, true },
    defunct_dead_in_active   = { Status::Defunct, false },
)]
fn wrong_bucket_status_is_flagged_as_anomaly_and_reclassified(current: Status, alive: bool) {
    let t = transition(current, BucketClass::Active, alive);
    assert_eq!(t.new_status, Status::Defunct);
    assert!(t.anomaly);
    assert!(!t.notify);
}

/// Exactly two notifications across two full escalations to flagged, with a
/// recovery in between each.
#[test]
fn recovery_round_trip_emits_exactly_two_notifications() {
    let mut status = Status::Active;
    let mut notifications = 0;

    let failures = [false, false, false, false]; // four straight misses escalate to flagged
    for alive in failures {
        let t = transition(status, BucketClass::Active, alive);
        if t.notify {
            notifications += 1;
        }
        status = t.new_status;
    }
    assert_eq!(status, Status::InactiveFlagged);
    assert_eq!(notifications, 1);

    // Recovers.
    let t = transition(status, BucketClass::Active, true);
    assert!(!t.notify);
    status = t.new_status;
    assert_eq!(status, Status::Active);

    // Escalates again.
    for alive in failures {
        let t = transition(status, BucketClass::Active, alive);
        if t.notify {
            notifications += 1;
        }
        status = t.new_status;
    }
    assert_eq!(status, Status::InactiveFlagged);
    assert_eq!(notifications, 2);
}
