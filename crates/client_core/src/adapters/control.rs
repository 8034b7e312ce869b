use shared::domain::{ParameterBounds, ParameterField};
use tracing::warn;

use crate::model::{ParameterModel, ParameterPatch};

/// Two bounded numeric inputs, one per field. Every change is written to the
/// model immediately; there is no debounce.
#[derive(Debug, Clone, Copy)]
pub struct ControlAdapter {
    a1: ParameterBounds,
    b1: ParameterBounds,
}

impl Default for ControlAdapter {
    fn default() -> Self {
        Self {
            a1: ParameterField::A1.bounds(),
            b1: ParameterField::B1.bounds(),
        }
    }
}

impl ControlAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds(&self, field: ParameterField) -> ParameterBounds {
        match field {
            ParameterField::A1 => self.a1,
            ParameterField::B1 => self.b1,
        }
    }

    /// Writes `raw` for `field`, snapped to the step and clamped to the bounds.
    /// Returns the value that was written, or `None` for a non-finite input.
    pub fn on_change(
        &self,
        model: &mut ParameterModel,
        field: ParameterField,
        raw: f64,
    ) -> Option<f64> {
        if !raw.is_finite() {
            warn!(%field, "ignoring non-finite control value");
            return None;
        }
        let value = self.bounds(field).snap(raw);
        model.set(ParameterPatch::field(field, value));
        Some(value)
    }

    /// Where the control for `field` should sit for the current model.
    /// File imports may hold values the control cannot show; those pin to the
    /// nearest bound without touching the model.
    pub fn position(&self, model: &ParameterModel, field: ParameterField) -> f64 {
        let bounds = self.bounds(field);
        match model.get() {
            Some(params) if params.get(field).is_finite() => {
                params.get(field).clamp(bounds.min, bounds.max)
            }
            _ => bounds.min,
        }
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::ParameterSet;

    use super::*;

    #[test]
    fn emitted_values_stay_within_bounds() {
        let control = ControlAdapter::new();
        let mut model = ParameterModel::new();
        let samples = [-1e9, -0.05, 0.0, 0.04, 12.345, 49.99, 50.0, 55.5, 60.0, 61.0, 1e9];

        for raw in samples {
            let a1 = control
                .on_change(&mut model, ParameterField::A1, raw)
                .expect("finite");
            let b1 = control
                .on_change(&mut model, ParameterField::B1, raw)
                .expect("finite");
            assert!((0.0..=50.0).contains(&a1), "a1 {a1} from {raw}");
            assert!((0.0..=60.0).contains(&b1), "b1 {b1} from {raw}");

            let params = model.get().expect("params");
            assert!((0.0..=50.0).contains(&params.a1));
            assert!((0.0..=60.0).contains(&params.b1));
        }
    }

    #[test]
    fn change_writes_single_field_at_tenth_granularity() {
        let control = ControlAdapter::new();
        let mut model = ParameterModel::with_defaults();

        assert_eq!(
            control.on_change(&mut model, ParameterField::B1, 33.333),
            Some(33.3)
        );
        assert_eq!(model.get(), Some(ParameterSet::new(0.0, 33.3)));
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let control = ControlAdapter::new();
        let mut model = ParameterModel::with_defaults();

        assert_eq!(control.on_change(&mut model, ParameterField::A1, f64::NAN), None);
        assert_eq!(model.get(), Some(ParameterSet::default()));
    }

    #[test]
    fn position_pins_out_of_range_file_values() {
        let control = ControlAdapter::new();
        let mut model = ParameterModel::new();
        assert_eq!(control.position(&model, ParameterField::A1), 0.0);

        model.replace(
            ParameterSet::new(80.0, -2.0),
            shared::domain::ParameterSource::File {
                name: "wide.txt".into(),
            },
        );
        assert_eq!(control.position(&model, ParameterField::A1), 50.0);
        assert_eq!(control.position(&model, ParameterField::B1), 0.0);
        assert_eq!(model.get(), Some(ParameterSet::new(80.0, -2.0)));
    }
}
