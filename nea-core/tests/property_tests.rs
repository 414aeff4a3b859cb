//! 属性测试 - KeyedList 有序性与叶子序列化

use std::collections::BTreeMap;

use nea_core::{Keyed, KeyedList, ValueNode, ValuePair};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

proptest! {
    #[test]
    fn keyed_list_stays_sorted(keys in prop::collection::vec(key_strategy(), 0..40)) {
        let mut list = KeyedList::new();
        for (i, key) in keys.iter().enumerate() {
            list.add(ValuePair::new(key.clone(), i));
        }
        prop_assert_eq!(list.len(), keys.len());
        let stored: Vec<&str> = list.keys().map(String::as_str).collect();
        let mut sorted = stored.clone();
        sorted.sort_unstable();
        prop_assert_eq!(stored, sorted);
        prop_assert!(list.capacity().is_power_of_two());
        prop_assert!(list.capacity() >= list.len());
    }

    #[test]
    fn keyed_list_interleaved_add_remove(
        ops in prop::collection::vec((any::<bool>(), "[a-e]"), 0..60),
    ) {
        let mut list: KeyedList<ValuePair<String, usize>> = KeyedList::new();
        let mut model: BTreeMap<String, usize> = BTreeMap::new();
        for (i, (is_add, key)) in ops.into_iter().enumerate() {
            if is_add {
                list.add(ValuePair::new(key.clone(), i));
                *model.entry(key).or_insert(0) += 1;
            } else {
                let count = model.get(&key).copied().unwrap_or(0);
                let removed = list.remove(key.as_str());
                prop_assert_eq!(removed.is_some(), count > 0);
                if let Some(pair) = removed {
                    prop_assert_eq!(pair.key(), &key);
                    model.insert(key, count - 1);
                }
            }
            let stored: Vec<&str> = list.keys().map(String::as_str).collect();
            prop_assert!(stored.windows(2).all(|w| w[0] <= w[1]));
            prop_assert_eq!(list.len(), model.values().sum::<usize>());
            for (key, count) in &model {
                prop_assert_eq!(list.contains(key.as_str()), *count > 0);
            }
        }
    }

    #[test]
    fn keyed_list_lookup_finds_inserted(entries in prop::collection::btree_map(key_strategy(), any::<i32>(), 0..40)) {
        let list: KeyedList<ValuePair<String, i32>> = entries
            .iter()
            .map(|(key, value)| ValuePair::new(key.clone(), *value))
            .collect();
        for (key, value) in &entries {
            prop_assert_eq!(list.get_key(key).map(|pair| *pair.value()), Some(*value));
        }
        prop_assert!(list.get_key("0-never").is_none());
    }

    #[test]
    fn keyed_list_fallback(
        own in prop::collection::btree_map(key_strategy(), any::<i32>(), 0..10),
        other in prop::collection::btree_map(key_strategy(), any::<i32>(), 0..10),
    ) {
        let primary: KeyedList<ValuePair<String, i32>> =
            own.iter().map(|(k, v)| ValuePair::new(k.clone(), *v)).collect();
        let fallback: KeyedList<ValuePair<String, i32>> =
            other.iter().map(|(k, v)| ValuePair::new(k.clone(), *v)).collect();
        let mut merged: BTreeMap<&String, i32> = other.iter().map(|(k, v)| (k, *v)).collect();
        merged.extend(own.iter().map(|(k, v)| (k, *v)));
        for (key, value) in merged {
            let found = primary.get_or(key, Some(&fallback)).map(|pair| *pair.value());
            prop_assert_eq!(found, Some(value));
        }
    }

    #[test]
    fn integer_leaf_round_trip(key in key_strategy(), value in any::<i64>()) {
        let saved = ValueNode::leaf(key.clone(), value).save(0);
        let parsed = ValueNode::parse(&saved).unwrap();
        prop_assert_eq!(parsed.key(), key.as_str());
        prop_assert_eq!(parsed.as_integer().unwrap(), value);
    }

    #[test]
    fn decimal_leaf_round_trip(key in key_strategy(), value in -1.0e9f64..1.0e9) {
        let saved = ValueNode::leaf(key.clone(), value).save(0);
        let parsed = ValueNode::parse(&saved).unwrap();
        prop_assert_eq!(parsed.as_decimal().unwrap(), value);
    }

    #[test]
    fn boolean_leaf_round_trip(key in key_strategy(), value in any::<bool>()) {
        let saved = ValueNode::leaf(key.clone(), value).save(0);
        let parsed = ValueNode::parse(&saved).unwrap();
        prop_assert_eq!(parsed.as_bool().unwrap(), value);
    }

    #[test]
    fn text_leaf_round_trip(key in key_strategy(), value in "[A-Za-z][A-Za-z ,.]{0,20}[A-Za-z]") {
        let saved = ValueNode::leaf(key.clone(), value.as_str()).save(0);
        let parsed = ValueNode::parse(&saved).unwrap();
        prop_assert_eq!(parsed.as_text().unwrap(), value);
    }
}
