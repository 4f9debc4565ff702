mod area_id;
mod connection;
#[allow(clippy::module_inception)]
mod cortical_area;
mod laminar;
mod parcellation;
mod population;

pub use area_id::AreaId;
pub use connection::{ConnectionRecord, Flne};
pub use cortical_area::CorticalArea;
pub use laminar::{CorticalLayer, LaminarPattern, LayerSet};
pub use parcellation::Parcellation;
pub use population::LayerPopulation;

/// Reject negative, NaN and infinite measurements
pub(crate) fn check_measure(what: &str, value: f64) -> Result<f64, crate::StructuresError> {
    if !value.is_finite() {
        return Err(crate::StructuresError::InvalidMeasure(format!(
            "{} must be finite, got {}",
            what, value
        )));
    }
    if value < 0.0 {
        return Err(crate::StructuresError::InvalidMeasure(format!(
            "{} must be non-negative, got {}",
            what, value
        )));
    }
    Ok(value)
}
