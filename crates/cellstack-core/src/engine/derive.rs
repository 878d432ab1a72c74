use crate::core::models::cell::CellRecord;
use crate::core::models::configuration::StackConfiguration;
use crate::engine::config::Constraints;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeriveError {
    #[error("Degenerate {dimension} {value} for product '{product}' (line {line})")]
    DegenerateDimension {
        product: String,
        line: u64,
        dimension: &'static str,
        value: f64,
    },
    #[error("Capacity {value} of product '{product}' (line {line}) is not a finite number")]
    NonFiniteCapacity {
        product: String,
        line: u64,
        value: f64,
    },
}

/// Derives the largest stack of `record` that fits `constraints`.
///
/// Returns `Ok(None)` when the cell's thickness falls outside the thickness window. A cell
/// wider or longer than the envelope is still derived, with a zero count on that axis.
///
/// The thickness count is taken against the window's upper bound, not its span.
pub fn derive(
    record: &CellRecord,
    constraints: &Constraints,
) -> Result<Option<StackConfiguration>, DeriveError> {
    let range = constraints.thickness_range;
    if !range.contains(record.thickness) {
        return Ok(None);
    }

    check_dimension(record, "width", record.width)?;
    check_dimension(record, "length", record.length)?;
    check_dimension(record, "thickness", record.thickness)?;
    if !record.capacity.is_finite() {
        return Err(DeriveError::NonFiniteCapacity {
            product: record.product.clone(),
            line: record.line,
            value: record.capacity,
        });
    }

    let width_count = floor_div(f64::from(constraints.max_width), record.width);
    let length_count = floor_div(f64::from(constraints.max_length), record.length);
    let thickness_count = floor_div(f64::from(range.to), record.thickness);

    let total_capacity = (record.capacity * (width_count * length_count * thickness_count)) as u64;
    let energy_density = round_to_hundredths(record.capacity / record.volume());

    Ok(Some(StackConfiguration {
        product: record.product.clone(),
        total_capacity,
        individual_capacity: record.capacity as u64,
        size: format!(
            "{}x{}x{}",
            record.width as u64, record.length as u64, record.thickness as u64
        ),
        stacks: format!(
            "{}x{}x{}",
            width_count as u64, length_count as u64, thickness_count as u64
        ),
        config_thickness: (record.thickness * thickness_count) as u64,
        energy_density,
        score: StackConfiguration::compute_score(total_capacity, energy_density),
    }))
}

fn check_dimension(
    record: &CellRecord,
    dimension: &'static str,
    value: f64,
) -> Result<(), DeriveError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(DeriveError::DegenerateDimension {
            product: record.product.clone(),
            line: record.line,
            dimension,
            value,
        })
    }
}

/// Floor division on floats, computed from the remainder rather than from `a / b`.
///
/// `floor(a / b)` can overshoot when the quotient rounds up to an integer: `1 / 0.1` is
/// exactly `10.0` in binary floating point, although `0.1` fits into `1` only nine times.
fn floor_div(a: f64, b: f64) -> f64 {
    let rem = a % b;
    let div = (a - rem) / b;
    if div == 0.0 {
        return 0.0;
    }
    let mut quotient = div.floor();
    if div - quotient > 0.5 {
        quotient += 1.0;
    }
    quotient
}

/// Rounds to two decimals on the exact binary value, ties to even.
///
/// Scaling by 100 first would round the already inexact product instead: `0.125` must
/// become `0.12`, and `0.145` (stored just below) must become `0.14`.
fn round_to_hundredths(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
