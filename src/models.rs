// src/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownField;

/// How a raw entry is expressed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Currency per month; annualized (x12) in the payload.
    Monthly,
    /// Currency per year; passed through.
    Annual,
    /// Counts, rates, percentages and ratios; passed through.
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    DaysPerMonth,
    KmPerDay,
    FarePerKm,
    FuelCostPerLitre,
    VehicleKmpl,
    OilSpares,
    Taxes,
    Insurance,
    Maintenance,
    StaffSalary,
    Drawings,
    GarageRent,
    Others,
    DepreciationPct,
    InterestOnLoan,
    TaxProvision,
    RepaymentObligation,
    TargetDscr,
}

impl FieldKey {
    pub const ALL: [FieldKey; 18] = [
        FieldKey::DaysPerMonth,
        FieldKey::KmPerDay,
        FieldKey::FarePerKm,
        FieldKey::FuelCostPerLitre,
        FieldKey::VehicleKmpl,
        FieldKey::OilSpares,
        FieldKey::Taxes,
        FieldKey::Insurance,
        FieldKey::Maintenance,
        FieldKey::StaffSalary,
        FieldKey::Drawings,
        FieldKey::GarageRent,
        FieldKey::Others,
        FieldKey::DepreciationPct,
        FieldKey::InterestOnLoan,
        FieldKey::TaxProvision,
        FieldKey::RepaymentObligation,
        FieldKey::TargetDscr,
    ];

    /// Raw field name, as typed at the form.
    pub fn name(self) -> &'static str {
        match self {
            FieldKey::DaysPerMonth => "days_per_month",
            FieldKey::KmPerDay => "km_per_day",
            FieldKey::FarePerKm => "fare_per_km",
            FieldKey::FuelCostPerLitre => "fuel_cost_per_litre",
            FieldKey::VehicleKmpl => "vehicle_kmpl",
            FieldKey::OilSpares => "oil_spares",
            FieldKey::Taxes => "taxes",
            FieldKey::Insurance => "insurance",
            FieldKey::Maintenance => "maintenance",
            FieldKey::StaffSalary => "staff_salary",
            FieldKey::Drawings => "drawings",
            FieldKey::GarageRent => "garage_rent",
            FieldKey::Others => "others",
            FieldKey::DepreciationPct => "depreciation_pct",
            FieldKey::InterestOnLoan => "interest_on_loan",
            FieldKey::TaxProvision => "tax_provision",
            FieldKey::RepaymentObligation => "repayment_obligation",
            FieldKey::TargetDscr => "target_dscr",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldKey::DaysPerMonth => "Days on road / month",
            FieldKey::KmPerDay => "Km per day",
            FieldKey::FarePerKm => "Fare / rate per km",
            FieldKey::FuelCostPerLitre => "Fuel cost per litre",
            FieldKey::VehicleKmpl => "Vehicle kmpl",
            FieldKey::OilSpares => "Oil / Spares (monthly)",
            FieldKey::Taxes => "Taxes (monthly)",
            FieldKey::Insurance => "Insurance (monthly)",
            FieldKey::Maintenance => "Maintenance (monthly)",
            FieldKey::StaffSalary => "Staff salary (monthly)",
            FieldKey::Drawings => "Drawings (monthly)",
            FieldKey::GarageRent => "Garage rent (monthly)",
            FieldKey::Others => "Others (monthly)",
            FieldKey::DepreciationPct => "Depreciation (%)",
            FieldKey::InterestOnLoan => "Interest on loan (annual)",
            FieldKey::TaxProvision => "Tax provision (monthly)",
            FieldKey::RepaymentObligation => "Repayment obligation (annual)",
            FieldKey::TargetDscr => "Target DSCR",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            FieldKey::OilSpares
            | FieldKey::Taxes
            | FieldKey::Insurance
            | FieldKey::Maintenance
            | FieldKey::StaffSalary
            | FieldKey::Drawings
            | FieldKey::GarageRent
            | FieldKey::Others
            | FieldKey::TaxProvision => Unit::Monthly,
            FieldKey::InterestOnLoan | FieldKey::RepaymentObligation => Unit::Annual,
            _ => Unit::Plain,
        }
    }

    /// Key of this field in the canonical payload.
    pub fn wire_key(self) -> &'static str {
        match self {
            FieldKey::DaysPerMonth => "days_per_month",
            FieldKey::KmPerDay => "km_per_day",
            FieldKey::FarePerKm => "fare_per_km",
            FieldKey::FuelCostPerLitre => "fuel_cost_per_litre",
            FieldKey::VehicleKmpl => "vehicle_kmpl",
            FieldKey::OilSpares => "oil_spares_annual",
            FieldKey::Taxes => "taxes_annual",
            FieldKey::Insurance => "insurance_annual",
            FieldKey::Maintenance => "maintenance_annual",
            FieldKey::StaffSalary => "staff_salary_annual",
            FieldKey::Drawings => "drawings_annual",
            FieldKey::GarageRent => "garage_rent_annual",
            FieldKey::Others => "others_annual",
            FieldKey::DepreciationPct => "depreciation_rate_pct",
            FieldKey::InterestOnLoan => "interest_on_loan_annual",
            FieldKey::TaxProvision => "tax_provision_annual",
            FieldKey::RepaymentObligation => "repayment_obligation_annual",
            FieldKey::TargetDscr => "target_dscr",
        }
    }

    /// Value the form starts out with.
    pub fn default_value(self) -> &'static str {
        match self {
            FieldKey::DaysPerMonth => "20",
            FieldKey::KmPerDay => "250",
            FieldKey::FarePerKm => "12",
            FieldKey::FuelCostPerLitre => "100",
            FieldKey::VehicleKmpl => "5",
            FieldKey::OilSpares => "4000",
            FieldKey::Taxes => "2000",
            FieldKey::Insurance => "1500",
            FieldKey::Maintenance => "5000",
            FieldKey::StaffSalary => "0",
            FieldKey::Drawings => "2500",
            FieldKey::GarageRent => "0",
            FieldKey::Others => "1500",
            FieldKey::DepreciationPct => "10",
            FieldKey::InterestOnLoan => "50000",
            FieldKey::TaxProvision => "0",
            FieldKey::RepaymentObligation => "120000",
            FieldKey::TargetDscr => "2.5",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FieldKey {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Snapshot of every raw entry, exactly as typed.
///
/// Edits produce a new snapshot; the payload builder and validator only ever
/// see a shared borrow of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStore {
    values: BTreeMap<FieldKey, String>,
}

impl Default for FieldStore {
    fn default() -> Self {
        FieldStore {
            values: FieldKey::ALL
                .iter()
                .map(|key| (*key, key.default_value().to_string()))
                .collect(),
        }
    }
}

impl FieldStore {
    /// A store with every field blank.
    pub fn empty() -> Self {
        FieldStore {
            values: FieldKey::ALL.iter().map(|key| (*key, String::new())).collect(),
        }
    }

    pub fn get(&self, key: FieldKey) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }

    pub fn with_value(&self, key: FieldKey, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.values.insert(key, value.into());
        next
    }

    pub fn with_values<I, V>(&self, updates: I) -> Self
    where
        I: IntoIterator<Item = (FieldKey, V)>,
        V: Into<String>,
    {
        let mut next = self.clone();
        for (key, value) in updates {
            next.values.insert(key, value.into());
        }
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.values.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

/// The normalized request body sent to both endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPayload {
    pub days_per_month: f64,
    pub km_per_day: f64,
    pub fare_per_km: f64,
    pub fuel_cost_per_litre: f64,
    pub vehicle_kmpl: f64,
    pub oil_spares_annual: f64,
    pub taxes_annual: f64,
    pub insurance_annual: f64,
    pub maintenance_annual: f64,
    pub staff_salary_annual: f64,
    pub drawings_annual: f64,
    pub garage_rent_annual: f64,
    pub others_annual: f64,
    pub depreciation_rate_pct: f64,
    pub interest_on_loan_annual: f64,
    pub tax_provision_annual: f64,
    pub repayment_obligation_annual: f64,
    pub target_dscr: f64,
}

/// Response of the compute endpoint, kept whole for inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DscrResult {
    raw: Value,
}

/// Inputs the service suggests changing to reach the target DSCR.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjustedInputs {
    pub days_per_month: Option<f64>,
    pub depreciation_rate_pct: Option<f64>,
    pub drawings_annual: Option<f64>,
    pub others_annual: Option<f64>,
}

impl DscrResult {
    pub fn from_value(raw: Value) -> Self {
        DscrResult { raw }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn baseline_dscr(&self) -> Option<f64> {
        numeric(&self.raw["baseline"]["dscr"])
    }

    pub fn final_dscr(&self) -> Option<f64> {
        numeric(&self.raw["suggestion"]["final_dscr"])
    }

    /// Each key is read on its own; a key that is absent or not numeric
    /// does not affect the others.
    pub fn adjusted_inputs(&self) -> Option<AdjustedInputs> {
        let adjusted = &self.raw["suggestion"]["adjusted_inputs"];
        if !adjusted.is_object() {
            return None;
        }
        Some(AdjustedInputs {
            days_per_month: numeric(&adjusted["days_per_month"]),
            depreciation_rate_pct: numeric(&adjusted["depreciation_rate_pct"]),
            drawings_annual: numeric(&adjusted["drawings_annual"]),
            others_annual: numeric(&adjusted["others_annual"]),
        })
    }
}

// Numbers, or strings holding one.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}
