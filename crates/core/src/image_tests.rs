// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn iid(id: &str, global: &str) -> ImageIds {
    ImageIds::new(ImageId::new(id), GlobalImageId::new(global))
}

#[test]
fn image_ids_equality_ignores_global_id_and_name() {
    let a = iid("img-1", "g-a").with_name("alpha");
    let b = iid("img-1", "g-b").with_name("beta");
    assert_eq!(a, b, "ImageIds equality is on `id` alone per spec.md §4.4");
}

#[test]
fn image_ids_set_dedupes_by_id_only() {
    let mut set = HashSet::new();
    set.insert(iid("img-1", "g-a"));
    set.insert(iid("img-1", "g-b"));
    assert_eq!(set.len(), 1);
}

#[test]
fn init_image_info_orders_by_global_id() {
    let a = InitImageInfo {
        global_id: GlobalImageId::new("a"),
        pool_id: PoolId::new(1),
        id: ImageId::new("img-1"),
        name: "one".into(),
    };
    let b = InitImageInfo {
        global_id: GlobalImageId::new("b"),
        pool_id: PoolId::new(1),
        id: ImageId::new("img-2"),
        name: "two".into(),
    };
    assert!(a < b);
}

#[test]
fn init_image_info_equality_ignores_id_and_name() {
    let a = InitImageInfo {
        global_id: GlobalImageId::new("g"),
        pool_id: PoolId::new(1),
        id: ImageId::new("img-1"),
        name: "one".into(),
    };
    let b = InitImageInfo {
        global_id: GlobalImageId::new("g"),
        pool_id: PoolId::new(2),
        id: ImageId::new("img-2"),
        name: "two".into(),
    };
    assert_eq!(a, b);
}
