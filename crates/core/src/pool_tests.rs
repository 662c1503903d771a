// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn round_trips_through_i64() {
    let id = PoolId::new(7);
    assert_eq!(id.as_i64(), 7);
    assert_eq!(PoolId::from(7), id);
}

#[test]
fn display_matches_numeric_value() {
    assert_eq!(PoolId::new(42).to_string(), "42");
}

#[test]
fn ordering_is_numeric() {
    assert!(PoolId::new(1) < PoolId::new(2));
}

#[yare::parameterized(
    equal       = { 7, 7, std::cmp::Ordering::Equal },
    less        = { 1, 2, std::cmp::Ordering::Less },
    greater     = { 9, 3, std::cmp::Ordering::Greater },
)]
fn cmp_matches_numeric_comparison(a: i64, b: i64, expected: std::cmp::Ordering) {
    assert_eq!(PoolId::new(a).cmp(&PoolId::new(b)), expected);
}
