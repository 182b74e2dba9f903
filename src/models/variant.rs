//! Model variants: how a flat parameter vector becomes a template.
//!
//! Both variants reuse [`TemplateBuilder`]; the extended variant additionally
//! applies [`deviation::apply`](crate::models::deviation::apply) to the fitted
//! spectrum of each included mode.

use crate::domain::{
    AnalysisConfig, BaselineModeParams, Mode, ModeParams, ModelVariant, RemnantState, TemplateParams,
};
use crate::models::deviation;
use crate::models::params::{BaselineParams, ExtendedParams};
use crate::models::spectrum::frequency_and_decay;
use crate::models::template::TemplateBuilder;

/// A parametric ringdown waveform family.
///
/// Implementations hold only immutable, per-unit data and are safe to share
/// across threads.
pub trait RingdownModel: Sync {
    fn variant(&self) -> ModelVariant;

    fn builder(&self) -> &TemplateBuilder;

    /// Parameter names in vector order.
    fn param_names(&self) -> &'static [&'static str];

    fn dim(&self) -> usize {
        self.param_names().len()
    }

    /// Resolve a parameter vector of length [`RingdownModel::dim`].
    fn template_params(&self, theta: &[f64]) -> TemplateParams;

    fn waveform(&self, t: &[f64], theta: &[f64]) -> Vec<f64> {
        self.builder().template(t, &self.template_params(theta))
    }
}

/// Single (2,2) mode with free frequency and decay time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineModel {
    builder: TemplateBuilder,
}

impl BaselineModel {
    pub fn new(builder: TemplateBuilder) -> Self {
        Self { builder }
    }
}

impl RingdownModel for BaselineModel {
    fn variant(&self) -> ModelVariant {
        ModelVariant::Baseline
    }

    fn builder(&self) -> &TemplateBuilder {
        &self.builder
    }

    fn param_names(&self) -> &'static [&'static str] {
        &BaselineParams::NAMES
    }

    fn template_params(&self, theta: &[f64]) -> TemplateParams {
        let p = BaselineParams::from_slice(theta);
        TemplateParams {
            onset: p.onset,
            modes: vec![ModeParams {
                included: true,
                amplitude: p.amplitude,
                phase: p.phase,
                frequency: p.frequency,
                decay_time: p.decay_time,
            }],
        }
    }
}

/// Modes 22, 33, 21 with fractional deviations from the fitted spectrum.
///
/// The spectrum is evaluated once, at construction, and only for included modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtendedModel {
    builder: TemplateBuilder,
    baselines: [Option<BaselineModeParams>; 3],
}

impl ExtendedModel {
    pub fn new(builder: TemplateBuilder, remnant: &RemnantState, included: [bool; 3]) -> Self {
        let mut baselines = [None; 3];
        for mode in Mode::ALL {
            if included[mode.index()] {
                baselines[mode.index()] = Some(frequency_and_decay(remnant, mode));
            }
        }
        Self { builder, baselines }
    }

    /// Fitted spectrum of `mode`, or `None` when the mode is excluded.
    pub fn baseline(&self, mode: Mode) -> Option<BaselineModeParams> {
        self.baselines[mode.index()]
    }
}

impl RingdownModel for ExtendedModel {
    fn variant(&self) -> ModelVariant {
        ModelVariant::Extended
    }

    fn builder(&self) -> &TemplateBuilder {
        &self.builder
    }

    fn param_names(&self) -> &'static [&'static str] {
        &ExtendedParams::NAMES
    }

    fn template_params(&self, theta: &[f64]) -> TemplateParams {
        let p = ExtendedParams::from_slice(theta);
        let modes = Mode::ALL
            .iter()
            .map(|&mode| match self.baselines[mode.index()] {
                Some(base) => {
                    let shift = p.mode(mode);
                    let shifted = deviation::apply(base, shift.deviation);
                    ModeParams {
                        included: true,
                        amplitude: shift.amplitude,
                        phase: shift.phase,
                        frequency: shifted.frequency,
                        decay_time: shifted.decay_time,
                    }
                }
                None => ModeParams::excluded(),
            })
            .collect();
        TemplateParams {
            onset: p.onset,
            modes,
        }
    }
}

/// Either variant, built for one analysis unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariantModel {
    Baseline(BaselineModel),
    Extended(ExtendedModel),
}

impl VariantModel {
    pub fn build(variant: ModelVariant, remnant: &RemnantState, config: &AnalysisConfig) -> Self {
        let builder = TemplateBuilder::new(config.taper_width);
        match variant {
            ModelVariant::Baseline => VariantModel::Baseline(BaselineModel::new(builder)),
            ModelVariant::Extended => VariantModel::Extended(ExtendedModel::new(
                builder,
                remnant,
                config.extended_modes,
            )),
        }
    }

    fn inner(&self) -> &dyn RingdownModel {
        match self {
            VariantModel::Baseline(m) => m,
            VariantModel::Extended(m) => m,
        }
    }
}

impl RingdownModel for VariantModel {
    fn variant(&self) -> ModelVariant {
        self.inner().variant()
    }

    fn builder(&self) -> &TemplateBuilder {
        self.inner().builder()
    }

    fn param_names(&self) -> &'static [&'static str] {
        self.inner().param_names()
    }

    fn template_params(&self, theta: &[f64]) -> TemplateParams {
        self.inner().template_params(theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::time_axis;

    fn remnant() -> RemnantState {
        RemnantState::new(68.0, 0.67).unwrap()
    }

    #[test]
    fn extended_with_zero_deviation_reproduces_spectrum() {
        let model = ExtendedModel::new(TemplateBuilder::new(0.002), &remnant(), [true; 3]);
        let mut theta = vec![0.0; ExtendedParams::DIM];
        theta[0] = 1.0;
        let params = model.template_params(&theta);
        let base22 = frequency_and_decay(&remnant(), Mode::L2M2);
        assert_eq!(params.modes[0].frequency, base22.frequency);
        assert_eq!(params.modes[0].decay_time, base22.decay_time);
    }

    #[test]
    fn extended_single_mode_matches_baseline_template() {
        let builder = TemplateBuilder::new(0.002);
        let r = remnant();
        let extended = ExtendedModel::new(builder, &r, [true, false, false]);
        let base22 = frequency_and_decay(&r, Mode::L2M2);

        let mut theta = vec![0.0; ExtendedParams::DIM];
        theta[ExtendedParams::amplitude_index(0)] = 0.7;
        theta[ExtendedParams::amplitude_index(1)] = 0.9; // excluded, must not contribute
        theta[ExtendedParams::phase_index(0)] = 0.4;
        theta[ExtendedParams::ONSET_INDEX] = 0.012;

        let t = time_axis(4096.0, 0.1);
        let h_ext = extended.waveform(&t, &theta);

        let baseline = BaselineModel::new(builder);
        let h_base = baseline.waveform(&t, &[0.7, base22.frequency, base22.decay_time, 0.4, 0.012]);
        assert_eq!(h_ext, h_base);
    }

    #[test]
    fn excluded_modes_skip_spectrum() {
        let model = ExtendedModel::new(TemplateBuilder::new(0.002), &remnant(), [true, false, true]);
        assert!(model.baseline(Mode::L2M2).is_some());
        assert!(model.baseline(Mode::L3M3).is_none());
        let params = model.template_params(&[0.5; ExtendedParams::DIM]);
        assert!(!params.modes[1].included);
        assert!(params.modes[2].included);
    }

    #[test]
    fn variant_dimensions() {
        let cfg = AnalysisConfig::default();
        assert_eq!(VariantModel::build(ModelVariant::Baseline, &remnant(), &cfg).dim(), 5);
        assert_eq!(VariantModel::build(ModelVariant::Extended, &remnant(), &cfg).dim(), 13);
    }
}
