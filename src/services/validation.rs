// src/services/validation.rs
use crate::models::{CanonicalPayload, FieldKey};

pub const DAYS_PER_MONTH: &str = "Days per month";
pub const KM_PER_DAY: &str = "Km per day";
pub const FARE_PER_KM: &str = "Fare per km";
pub const REPAYMENT_OBLIGATION: &str = "Repayment obligation (annual)";

/// Fields flagged for highlighting whenever validation fails, regardless of
/// which ones are missing.
pub const TOUCHED_ON_FAILURE: [FieldKey; 4] = [
    FieldKey::DaysPerMonth,
    FieldKey::KmPerDay,
    FieldKey::FarePerKm,
    FieldKey::RepaymentObligation,
];

fn is_falsy(value: f64) -> bool {
    value == 0.0 || value.is_nan()
}

/// Labels of the mandatory fields that are missing, in form order.
/// An empty list means the payload may be submitted.
///
/// Zero counts as missing for everything except the fare, which only fails
/// when it is not a number at all.
pub fn validate(payload: &CanonicalPayload) -> Vec<&'static str> {
    let mut missing = Vec::new();

    if is_falsy(payload.days_per_month) {
        missing.push(DAYS_PER_MONTH);
    }
    if is_falsy(payload.km_per_day) {
        missing.push(KM_PER_DAY);
    }
    if is_falsy(payload.fare_per_km) && payload.fare_per_km != 0.0 {
        missing.push(FARE_PER_KM);
    }
    if is_falsy(payload.repayment_obligation_annual) {
        missing.push(REPAYMENT_OBLIGATION);
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldStore;
    use crate::services::payload::build_payload;
    use pretty_assertions::assert_eq;

    fn payload_with(updates: &[(FieldKey, &str)]) -> CanonicalPayload {
        build_payload(&FieldStore::default().with_values(updates.iter().copied()))
    }

    #[test]
    fn default_form_is_valid() {
        assert!(validate(&payload_with(&[])).is_empty());
    }

    #[test]
    fn happy_path_inputs_are_valid() {
        let payload = payload_with(&[
            (FieldKey::DaysPerMonth, "20"),
            (FieldKey::KmPerDay, "250"),
            (FieldKey::FarePerKm, "12"),
            (FieldKey::RepaymentObligation, "120000"),
        ]);
        assert!(validate(&payload).is_empty());
    }

    #[test]
    fn zero_days_is_missing() {
        let payload = payload_with(&[(FieldKey::DaysPerMonth, "0")]);
        assert_eq!(validate(&payload), vec![DAYS_PER_MONTH]);
    }

    #[test]
    fn missing_labels_keep_fixed_order() {
        let fields = [
            (FieldKey::DaysPerMonth, DAYS_PER_MONTH),
            (FieldKey::KmPerDay, KM_PER_DAY),
            (FieldKey::RepaymentObligation, REPAYMENT_OBLIGATION),
        ];

        // Every non-empty subset of the zero-rejecting fields.
        for mask in 1u8..8 {
            let blanked: Vec<_> = fields
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u8 << *i) != 0)
                .map(|(_, f)| *f)
                .collect();
            let updates: Vec<_> = blanked.iter().map(|(key, _)| (*key, "")).collect();
            let expected: Vec<_> = blanked.iter().map(|(_, label)| *label).collect();

            assert_eq!(validate(&payload_with(&updates)), expected);
        }
    }

    #[test]
    fn zero_fare_is_accepted() {
        let payload = payload_with(&[(FieldKey::FarePerKm, "0")]);
        assert!(validate(&payload).is_empty());

        // Unparsable fares coerce to zero and are accepted the same way.
        let payload = payload_with(&[(FieldKey::FarePerKm, "")]);
        assert!(validate(&payload).is_empty());
    }

    #[test]
    fn nan_fare_is_rejected() {
        let mut payload = payload_with(&[]);
        payload.fare_per_km = f64::NAN;
        assert_eq!(validate(&payload), vec![FARE_PER_KM]);
    }

    #[test]
    fn nan_in_zero_rejecting_fields_is_rejected() {
        let mut payload = payload_with(&[]);
        payload.km_per_day = f64::NAN;
        assert_eq!(validate(&payload), vec![KM_PER_DAY]);
    }

    #[test]
    fn optional_fields_never_fail() {
        let optional: Vec<_> = FieldKey::ALL
            .iter()
            .filter(|key| !TOUCHED_ON_FAILURE.contains(key))
            .map(|key| (*key, ""))
            .collect();
        assert!(validate(&payload_with(&optional)).is_empty());
    }
}
