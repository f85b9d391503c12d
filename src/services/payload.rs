// src/services/payload.rs
use regex::Regex;
use std::sync::OnceLock;

use crate::models::{CanonicalPayload, FieldKey, FieldStore, Unit};

// Longest leading decimal literal: "12.5abc" -> "12.5", "1e3x" -> "1e3".
fn numeric_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("numeric prefix pattern is valid")
    })
}

/// Parses the leading number of `raw`, or returns `fallback` when there is
/// none or it is not finite.
pub fn to_number(raw: &str, fallback: f64) -> f64 {
    numeric_prefix()
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(fallback)
}

pub fn monthly_to_annual(raw: &str) -> f64 {
    to_number(raw, 0.0) * 12.0
}

/// Canonical value of one field: monthly entries are annualized, everything
/// else passes through.
pub fn canonical_value(store: &FieldStore, key: FieldKey) -> f64 {
    let raw = store.get(key);
    match key.unit() {
        Unit::Monthly => monthly_to_annual(raw),
        Unit::Annual | Unit::Plain => to_number(raw, 0.0),
    }
}

pub fn build_payload(store: &FieldStore) -> CanonicalPayload {
    let value = |key| canonical_value(store, key);

    CanonicalPayload {
        days_per_month: value(FieldKey::DaysPerMonth),
        km_per_day: value(FieldKey::KmPerDay),
        fare_per_km: value(FieldKey::FarePerKm),
        fuel_cost_per_litre: value(FieldKey::FuelCostPerLitre),
        vehicle_kmpl: value(FieldKey::VehicleKmpl),
        oil_spares_annual: value(FieldKey::OilSpares),
        taxes_annual: value(FieldKey::Taxes),
        insurance_annual: value(FieldKey::Insurance),
        maintenance_annual: value(FieldKey::Maintenance),
        staff_salary_annual: value(FieldKey::StaffSalary),
        drawings_annual: value(FieldKey::Drawings),
        garage_rent_annual: value(FieldKey::GarageRent),
        others_annual: value(FieldKey::Others),
        depreciation_rate_pct: value(FieldKey::DepreciationPct),
        interest_on_loan_annual: value(FieldKey::InterestOnLoan),
        tax_provision_annual: value(FieldKey::TaxProvision),
        repayment_obligation_annual: value(FieldKey::RepaymentObligation),
        target_dscr: value(FieldKey::TargetDscr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_form_builds_expected_payload() {
        let payload = build_payload(&FieldStore::default());

        assert_eq!(
            payload,
            CanonicalPayload {
                days_per_month: 20.0,
                km_per_day: 250.0,
                fare_per_km: 12.0,
                fuel_cost_per_litre: 100.0,
                vehicle_kmpl: 5.0,
                oil_spares_annual: 48000.0,
                taxes_annual: 24000.0,
                insurance_annual: 18000.0,
                maintenance_annual: 60000.0,
                staff_salary_annual: 0.0,
                drawings_annual: 30000.0,
                garage_rent_annual: 0.0,
                others_annual: 18000.0,
                depreciation_rate_pct: 10.0,
                interest_on_loan_annual: 50000.0,
                tax_provision_annual: 0.0,
                repayment_obligation_annual: 120000.0,
                target_dscr: 2.5,
            }
        );
    }

    #[test]
    fn monthly_values_annualize_and_round_trip() {
        for monthly in ["0", "1", "333.33", "1234.56", "99999.99", "0.01"] {
            let store = FieldStore::default().with_value(FieldKey::Drawings, monthly);
            let payload = build_payload(&store);
            let m: f64 = monthly.parse().unwrap();

            assert_eq!(payload.drawings_annual, m * 12.0);
            assert!((payload.drawings_annual / 12.0 - m).abs() < 1e-9);
        }
    }

    #[test]
    fn annual_and_plain_fields_pass_through() {
        let store = FieldStore::default()
            .with_value(FieldKey::InterestOnLoan, "36000")
            .with_value(FieldKey::DepreciationPct, "7.5");
        let payload = build_payload(&store);

        assert_eq!(payload.interest_on_loan_annual, 36000.0);
        assert_eq!(payload.depreciation_rate_pct, 7.5);
    }

    #[test]
    fn unparsable_input_falls_back_to_zero() {
        for raw in ["", "   ", "abc", "-", ".", "e5", "Infinity", "NaN", "1e999"] {
            assert_eq!(to_number(raw, 0.0), 0.0, "input {:?}", raw);

            let store = FieldStore::default().with_value(FieldKey::Taxes, raw);
            let annual = build_payload(&store).taxes_annual;
            assert_eq!(annual, 0.0);
            assert!(!annual.is_nan());
        }
    }

    #[test]
    fn leading_number_is_used() {
        assert_eq!(to_number("12abc", 0.0), 12.0);
        assert_eq!(to_number("  3.5 km", 0.0), 3.5);
        assert_eq!(to_number("-.5", 0.0), -0.5);
        assert_eq!(to_number("1e3x", 0.0), 1000.0);
        assert_eq!(to_number("7e", 0.0), 7.0);
        assert_eq!(to_number("5.", 0.0), 5.0);
    }

    #[test]
    fn fallback_is_caller_specified() {
        assert_eq!(to_number("n/a", 42.0), 42.0);
    }

    #[test]
    fn same_store_same_payload() {
        let store = FieldStore::default().with_value(FieldKey::Others, "1250.5");
        assert_eq!(build_payload(&store), build_payload(&store));
    }
}
