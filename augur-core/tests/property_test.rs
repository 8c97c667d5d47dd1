use augur_core::{Category, Confidence, Outcome};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

proptest! {
    #[test]
    fn confidence_stays_in_unit_interval(raw in any::<f64>()) {
        let value = Confidence::new(raw).value();
        prop_assert!((0.0..=1.0).contains(&value));
    }

    #[test]
    fn exactly_one_category_accepts_each_value(value in 0i64..=14, cat in category()) {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let accepted = Outcome::new(value, cat, ts).is_ok();
        prop_assert_eq!(accepted, Category::for_value(value) == Some(cat));
        let accepting = Category::ALL
            .into_iter()
            .filter(|c| Outcome::new(value, *c, ts).is_ok())
            .count();
        prop_assert_eq!(accepting, 1);
    }

    #[test]
    fn out_of_range_values_are_rejected(value in prop_oneof![i64::MIN..0i64, 15i64..i64::MAX]) {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        prop_assert!(Outcome::from_value(value, ts).is_err());
        prop_assert!(Category::for_value(value).is_none());
    }

    #[test]
    fn third_differs_from_both(a in category(), b in category()) {
        match a.third(b) {
            Some(c) => {
                prop_assert!(a != b);
                prop_assert!(c != a && c != b);
            }
            None => prop_assert_eq!(a, b),
        }
        prop_assert_ne!(a.opposite(), a);
    }
}
