//! Property tests for the behavior every definition must uphold regardless
//! of input.

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use tsys_core::{ErrorCode, ErrorDetail, NativeKind};
use tsys_types::factory::{array, boolean, integer, number, object, string, union};
use tsys_types::TypeDef;

fn account() -> TypeDef {
    object("An account.")
        .property("id", integer("ID.").minimum(1).build().unwrap())
        .property("name", string("Name.").max_length(40).build().unwrap())
        .property("active", boolean("Active.").build().unwrap())
        .property("score", number("Score.").build().unwrap())
        .required(["id", "name", "active"])
        .build()
        .unwrap()
}

const REQUIRED: [&str; 3] = ["id", "name", "active"];

prop_compose! {
    fn account_input()(
        id in 1i64..1_000_000,
        name in "[a-zA-Z][a-zA-Z ]{0,38}[a-zA-Z]",
        active in any::<bool>(),
        score in proptest::option::of(-1.0e6f64..1.0e6),
    ) -> Value {
        let mut map = Map::new();
        map.insert("id".into(), json!(id));
        map.insert("name".into(), json!(name));
        map.insert("active".into(), json!(active));
        if let Some(score) = score {
            map.insert("score".into(), json!(score));
        }
        Value::Object(map)
    }
}

proptest! {
    #[test]
    fn conforming_objects_always_validate(input in account_input()) {
        prop_assert!(account().validate(&input).is_ok());
    }

    #[test]
    fn each_missing_required_property_is_reported(
        input in account_input(),
        dropped in proptest::sample::subsequence(REQUIRED.to_vec(), 1..=3),
    ) {
        let mut input = input;
        let map = input.as_object_mut().unwrap();
        for name in &dropped {
            map.remove(*name);
        }

        let err = account().validate(&input).unwrap_err();
        for name in &dropped {
            prop_assert_eq!(
                err.field(*name).and_then(ErrorDetail::code),
                Some(ErrorCode::Required)
            );
        }
        for name in REQUIRED.iter().filter(|n| !dropped.contains(*n)) {
            prop_assert!(err.field(*name).is_none());
        }
    }

    #[test]
    fn duplicates_raise_unique_items(
        items in proptest::collection::vec(-50i64..50, 1..20),
        pick in any::<proptest::sample::Index>(),
    ) {
        let def = array("Unique ints.")
            .items(integer("int").build().unwrap())
            .unique_items(true)
            .build()
            .unwrap();

        let mut with_dup = items.clone();
        with_dup.push(items[pick.index(items.len())]);
        let err = def.validate(&json!(with_dup)).unwrap_err();
        let fields = err.fields().unwrap();
        prop_assert!(fields.values().any(|d| d.code() == Some(ErrorCode::UniqueItems)));
    }

    #[test]
    fn distinct_items_never_raise_unique_items(
        items in proptest::collection::btree_set(-1000i64..1000, 0..20),
    ) {
        let def = array("Unique ints.")
            .items(integer("int").build().unwrap())
            .unique_items(true)
            .build()
            .unwrap();
        let items: Vec<i64> = items.into_iter().collect();
        prop_assert!(def.validate(&json!(items)).is_ok());
    }

    #[test]
    fn min_length_is_enforced_exactly(min in 1usize..10, text in "[a-z]{0,15}") {
        let def = string("Text.").min_length(min).build().unwrap();
        let result = def.validate(&json!(text));
        if text.chars().count() < min {
            let expected = if min == 1 { ErrorCode::Blank } else { ErrorCode::MinLength };
            prop_assert_eq!(result.unwrap_err().code(), Some(expected));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn union_prefers_the_first_accepting_candidate(n in any::<i32>()) {
        let def = union(
            "Int or number.",
            vec![integer("int").build().unwrap(), number("num").build().unwrap()],
        )
        .build()
        .unwrap();
        let matched = def.as_union().unwrap().resolve(&json!(n)).unwrap();
        prop_assert_eq!(matched.index, 0);
        prop_assert_eq!(matched.kind, NativeKind::Integer);
        prop_assert_eq!(matched.value.as_i64(), Some(i64::from(n)));
    }

    #[test]
    fn revalidating_coerced_output_is_stable(input in account_input()) {
        let def = account();
        let first = def.validate(&input).unwrap();
        let second = def.validate(&first.to_json()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn coerced_strings_are_stable(raw in "\\PC{0,30}") {
        let def = string("Text.").build().unwrap();
        if let Ok(first) = def.validate(&json!(raw)) {
            let second = def.validate(&first.to_json()).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}

#[test]
fn required_names_are_the_declared_set() {
    let def = account();
    let names: BTreeSet<&str> = def
        .as_object()
        .unwrap()
        .required_names()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(names, REQUIRED.into_iter().collect());
}
