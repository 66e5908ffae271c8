use std::collections::BTreeMap;

use kubefield_core::rules::{validate_labels, validate_name};
use kubefield_core::{Engine, FieldValue, Rule};
use proptest::prelude::*;
use proptest::test_runner::Config;

const LABEL: &str = "[a-z0-9]([-a-z0-9]{0,10}[a-z0-9])?";
const LABEL_VALUE: &str = "([A-Za-z0-9]([-A-Za-z0-9_.]{0,10}[A-Za-z0-9])?)?";
const KEY: &str = "([a-z0-9]{1,8}\\.[a-z]{2,4}/)?[A-Za-z0-9]([-A-Za-z0-9_.]{0,10}[A-Za-z0-9])?";

fn subdomain() -> impl Strategy<Value = String> {
    prop::collection::vec(LABEL, 1..5).prop_map(|labels| labels.join("."))
}

fn label_map() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(KEY, LABEL_VALUE, 1..8)
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn dns_subdomains_are_valid_names(name in subdomain()) {
        prop_assert!(validate_name(&FieldValue::from(name.clone()), "metadata.name").is_valid(), "{}", name);
    }

    #[test]
    fn uppercase_breaks_a_name(name in subdomain(), at in any::<prop::sample::Index>()) {
        let mut chars: Vec<char> = name.chars().collect();
        let i = at.index(chars.len());
        prop_assume!(chars[i].is_ascii_lowercase());
        chars[i] = chars[i].to_ascii_uppercase();
        let name: String = chars.into_iter().collect();
        prop_assert!(validate_name(&FieldValue::from(name), "metadata.name").has_errors());
    }

    #[test]
    fn well_formed_labels_pass(labels in label_map()) {
        let value = FieldValue::map(labels);
        prop_assert!(validate_labels(&value, "metadata.labels").is_valid());
    }

    #[test]
    fn one_non_string_label_is_one_error(labels in label_map(), pick in any::<prop::sample::Index>(), n in any::<i64>()) {
        let key = pick.get(&labels.keys().cloned().collect::<Vec<_>>()).clone();
        let mut entries: BTreeMap<String, FieldValue> =
            labels.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect();
        entries.insert(key.clone(), FieldValue::Int(n));

        let diags = validate_labels(&FieldValue::Map(entries), "metadata.labels");
        prop_assert_eq!(diags.error_count(), 1);
        prop_assert_eq!(diags.errors[0].entry.as_deref(), Some(key.as_str()));
    }

    #[test]
    fn rules_are_idempotent(input in ".{0,40}", n in any::<i64>()) {
        let engine = Engine::default();
        for rule in Rule::all() {
            for value in [FieldValue::from(input.clone()), FieldValue::Int(n)] {
                prop_assert_eq!(
                    engine.validate(&rule, &value, "field"),
                    engine.validate(&rule, &value, "field")
                );
            }
        }
    }
}
