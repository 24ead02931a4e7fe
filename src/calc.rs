// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Closed-form calculators for loans, investments and taxes.
//!
//! Every function here is total: out-of-domain input (non-positive principal
//! or tenure, negative rates, NaN/infinite values) yields the type's
//! `Default`, an all-zero result, instead of an error. Nothing is rounded;
//! rounding belongs to whoever prints the result.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::ParseKindError;

fn finite(vals: &[f64]) -> bool {
    vals.iter().all(|v| v.is_finite())
}

/// Monthly rate from an annual percentage.
fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 1200.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Emi {
    pub emi: f64,
    pub months: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

/// Equated monthly installment for `principal` at `annual_rate` percent over
/// `years`.
///
/// EMI = P × r × (1 + r)^n / [(1 + r)^n - 1], with r = R/1200 and n = N×12.
pub fn emi(principal: f64, annual_rate: f64, years: f64) -> Emi {
    if !finite(&[principal, annual_rate, years])
        || principal <= 0.0
        || years <= 0.0
        || annual_rate < 0.0
    {
        return Emi::default();
    }
    let r = monthly_rate(annual_rate);
    let n = years * 12.0;
    let emi = if r == 0.0 {
        principal / n
    } else {
        let factor = (1.0 + r).powf(n);
        principal * r * factor / (factor - 1.0)
    };
    if !emi.is_finite() {
        return Emi::default();
    }
    let total_payment = emi * n;
    Emi {
        emi,
        months: n,
        total_payment,
        total_interest: total_payment - principal,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sip {
    pub future_value: f64,
    pub total_invested: f64,
    pub gain: f64,
}

/// Future value of a monthly SIP, contributions at the start of each month.
pub fn sip(monthly: f64, annual_rate: f64, years: f64) -> Sip {
    if !finite(&[monthly, annual_rate, years])
        || monthly <= 0.0
        || years <= 0.0
        || annual_rate < 0.0
    {
        return Sip::default();
    }
    let r = monthly_rate(annual_rate);
    let n = years * 12.0;
    let future_value = if r == 0.0 {
        monthly * n
    } else {
        monthly * ((1.0 + r).powf(n) - 1.0) / r * (1.0 + r)
    };
    let total_invested = monthly * n;
    if !finite(&[future_value, total_invested]) {
        return Sip::default();
    }
    Sip {
        future_value,
        total_invested,
        gain: (future_value - total_invested).max(0.0),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub months: u64,
    pub years: f64,
    pub total_invested: f64,
}

/// Whole months of saving `monthly` at `annual_rate` needed to reach `target`.
///
/// Partial months round up: the last month still needs a full contribution.
pub fn goal(target: f64, monthly: f64, annual_rate: f64) -> Goal {
    if !finite(&[target, monthly, annual_rate])
        || target <= 0.0
        || monthly <= 0.0
        || annual_rate < 0.0
    {
        return Goal::default();
    }
    let r = monthly_rate(annual_rate);
    let simple = target / monthly;
    let raw = if r == 0.0 {
        simple
    } else {
        let n = (target * r / monthly + 1.0).ln() / (1.0 + r).ln();
        // Keep this guard: extreme inputs can still produce NaN or negatives.
        if !n.is_finite() || n < 0.0 { simple } else { n }
    };
    let months = raw.ceil();
    Goal {
        months: months as u64,
        years: months / 12.0,
        total_invested: months * monthly,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GstMode {
    /// Tax is added on top of the amount.
    #[default]
    Exclusive,
    /// The amount already contains the tax.
    Inclusive,
}

impl fmt::Display for GstMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GstMode::Exclusive => "exclusive",
            GstMode::Inclusive => "inclusive",
        })
    }
}

impl FromStr for GstMode {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclusive" | "excl" => Ok(GstMode::Exclusive),
            "inclusive" | "incl" => Ok(GstMode::Inclusive),
            _ => Err(ParseKindError::new("GST mode", s, "exclusive, inclusive")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Gst {
    pub base: f64,
    pub gst: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub total: f64,
}

pub fn gst(amount: f64, rate: f64, mode: GstMode) -> Gst {
    if !finite(&[amount, rate]) || amount <= 0.0 || rate < 0.0 {
        return Gst::default();
    }
    let (base, tax, total) = match mode {
        GstMode::Exclusive => {
            let tax = amount * rate / 100.0;
            (amount, tax, amount + tax)
        }
        GstMode::Inclusive => {
            let base = amount / (1.0 + rate / 100.0);
            (base, amount - base, amount)
        }
    };
    Gst {
        base,
        gst: tax,
        cgst: tax / 2.0,
        sgst: tax / 2.0,
        total,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedDeposit {
    pub interest: f64,
    pub maturity: f64,
}

/// Simple-interest fixed deposit.
pub fn fixed_deposit(principal: f64, rate: f64, years: f64) -> FixedDeposit {
    if !finite(&[principal, rate, years]) || principal <= 0.0 || years <= 0.0 || rate < 0.0 {
        return FixedDeposit::default();
    }
    let interest = principal * rate * years / 100.0;
    FixedDeposit {
        interest,
        maturity: principal + interest,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InflationAdjusted {
    pub real_rate: f64,
    pub nominal_value: f64,
    pub adjusted_value: f64,
    /// Nominal minus real future value. Negative when real growth beats
    /// nominal growth; reported as is.
    pub purchasing_power_loss: f64,
}

pub fn inflation_adjusted(
    principal: f64,
    nominal_rate: f64,
    inflation_rate: f64,
    years: f64,
) -> InflationAdjusted {
    if !finite(&[principal, nominal_rate, inflation_rate, years])
        || principal <= 0.0
        || years < 0.0
        || nominal_rate < 0.0
        || inflation_rate < 0.0
    {
        return InflationAdjusted::default();
    }
    let real_rate = (nominal_rate - inflation_rate) / 100.0;
    // A real rate below -100% has no real-valued compound growth.
    if 1.0 + real_rate < 0.0 {
        return InflationAdjusted::default();
    }
    let nominal_value = principal * (1.0 + nominal_rate / 100.0).powf(years);
    let adjusted_value = principal * (1.0 + real_rate).powf(years);
    if !finite(&[nominal_value, adjusted_value]) {
        return InflationAdjusted::default();
    }
    InflationAdjusted {
        real_rate,
        nominal_value,
        adjusted_value,
        purchasing_power_loss: nominal_value - adjusted_value,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentageOf {
    pub result: f64,
    pub increased: f64,
    pub decreased: f64,
}

pub fn percentage_of(amount: f64, percent: f64) -> PercentageOf {
    if !finite(&[amount, percent]) {
        return PercentageOf::default();
    }
    let result = amount * percent / 100.0;
    PercentageOf {
        result,
        increased: amount + result,
        decreased: amount - result,
    }
}

/// `part` as a percentage of `whole`; 0 when `whole` is 0.
pub fn percentage_difference(part: f64, whole: f64) -> f64 {
    if !finite(&[part, whole]) || whole == 0.0 {
        return 0.0;
    }
    part / whole * 100.0
}
