use common_money::Money;
use proptest::prelude::*;
use std::str::FromStr;

proptest! {
    // Any fractional tail is dropped; the integral part survives unchanged.
    #[test]
    fn fraction_is_truncated(whole in -1_000_000_000i64..1_000_000_000, frac in 0u32..100) {
        let m = Money::from_str(&format!("{whole}.{frac:02}")).unwrap();
        prop_assert_eq!(m.to_minor_units(), Some(whole));
    }

    #[test]
    fn integral_amounts_are_exact(v in any::<i64>()) {
        prop_assert_eq!(Money::from(v).to_minor_units(), Some(v));
    }

    // Serialized form is the decimal string so JSON payloads keep precision.
    #[test]
    fn json_keeps_value(whole in 0i64..1_000_000, frac in 0u32..1000) {
        let m = Money::from_str(&format!("{whole}.{frac:03}")).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, m);
    }
}
