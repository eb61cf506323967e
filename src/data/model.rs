use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(
        "invalid composition: NaCl {nacl}% + KCl {kcl}% does not leave a water \
         fraction in [0, 100]"
    )]
    InvalidComposition { nacl: f64, kcl: f64 },

    #[error("temperature {temperature}: more than one row is labelled as co-saturated")]
    DuplicateEutectic { temperature: Temperature },
}

// ---------------------------------------------------------------------------
// Temperature – group key
// ---------------------------------------------------------------------------

/// A temperature in °C, usable as an ordered map key.
///
/// `f64` is not `Ord`, so ordering goes through `total_cmp` the same way the
/// rest of the crate orders float-valued keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature(pub f64);

impl Eq for Temperature {}

impl PartialOrd for Temperature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Temperature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Whole-degree temperatures print without a trailing ".0" so file
        // names come out as "phase_25C.png" rather than "phase_25.0C.png".
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Measurement – one row of the source table
// ---------------------------------------------------------------------------

/// A single measured row after loading and temperature forward-fill.
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Temperature in °C.
    pub temperature: f64,
    /// Liquid-phase NaCl mass fraction in percent.
    pub nacl: f64,
    /// Liquid-phase KCl mass fraction in percent.
    pub kcl: f64,
    /// Solid-phase label, e.g. `NaCl`, `KCl` or the co-saturation label.
    pub solid_phase: String,
}

// ---------------------------------------------------------------------------
// Composition – a point on the solubility surface
// ---------------------------------------------------------------------------

/// A three-way mass composition summing to 100%, with the water fraction
/// derived from the two salt fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    pub nacl: f64,
    pub kcl: f64,
    pub h2o: f64,
}

impl Composition {
    /// Build a composition from the two salt percentages.
    ///
    /// Both fractions must be in `[0, 100]` and sum to at most 100 so the
    /// derived water fraction is non-negative.
    pub fn new(nacl: f64, kcl: f64) -> Result<Self, ModelError> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(nacl) || !in_range(kcl) || nacl + kcl > 100.0 {
            return Err(ModelError::InvalidComposition { nacl, kcl });
        }
        Ok(Composition {
            nacl,
            kcl,
            h2o: 100.0 - nacl - kcl,
        })
    }
}

// ---------------------------------------------------------------------------
// TemperatureGroup – all rows sharing one temperature
// ---------------------------------------------------------------------------

/// The measured curve at one temperature, in input row order, plus the
/// optional eutectic (co-saturation) point.
#[derive(Debug, Clone)]
pub struct TemperatureGroup {
    pub temperature: Temperature,
    /// Measured points in the order they appeared in the table; this is the
    /// traversal order of the plotted curve.
    pub points: Vec<Composition>,
    /// The unique co-saturation point, if the group has one.
    pub eutectic: Option<Composition>,
}

// ---------------------------------------------------------------------------
// SolubilityDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All temperature groups, in first-appearance order of their temperatures.
#[derive(Debug, Clone)]
pub struct SolubilityDataset {
    pub groups: Vec<TemperatureGroup>,
}

impl SolubilityDataset {
    /// Group measurements by temperature and identify eutectic points.
    ///
    /// A row whose solid-phase label equals `eutectic_label` exactly marks
    /// the group's eutectic; a second such row in the same group is an error.
    pub fn from_measurements(
        measurements: &[Measurement],
        eutectic_label: &str,
    ) -> Result<Self, ModelError> {
        let mut groups: Vec<TemperatureGroup> = Vec::new();

        for m in measurements {
            let temperature = Temperature(m.temperature);
            let composition = Composition::new(m.nacl, m.kcl)?;

            let idx = match groups.iter().position(|g| g.temperature == temperature) {
                Some(i) => i,
                None => {
                    groups.push(TemperatureGroup {
                        temperature,
                        points: Vec::new(),
                        eutectic: None,
                    });
                    groups.len() - 1
                }
            };
            let group = &mut groups[idx];

            group.points.push(composition);
            if m.solid_phase == eutectic_label {
                if group.eutectic.is_some() {
                    return Err(ModelError::DuplicateEutectic { temperature });
                }
                group.eutectic = Some(composition);
            }
        }

        Ok(SolubilityDataset { groups })
    }

    /// Total number of measured points across all groups.
    pub fn point_count(&self) -> usize {
        self.groups.iter().map(|g| g.points.len()).sum()
    }

    /// Whether the dataset holds no measurements at all.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(temperature: f64, nacl: f64, kcl: f64, solid_phase: &str) -> Measurement {
        Measurement {
            temperature,
            nacl,
            kcl,
            solid_phase: solid_phase.to_string(),
        }
    }

    #[test]
    fn water_fraction_is_the_remainder() {
        let c = Composition::new(8.0, 12.0).unwrap();
        assert_eq!(c.h2o, 80.0);

        let c = Composition::new(0.0, 0.0).unwrap();
        assert_eq!(c.h2o, 100.0);

        let c = Composition::new(60.0, 40.0).unwrap();
        assert_eq!(c.h2o, 0.0);
    }

    #[test]
    fn oversaturated_composition_is_rejected() {
        assert!(matches!(
            Composition::new(60.0, 60.0),
            Err(ModelError::InvalidComposition { .. })
        ));
        assert!(Composition::new(-1.0, 10.0).is_err());
        assert!(Composition::new(10.0, 101.0).is_err());
    }

    #[test]
    fn groups_single_temperature_with_eutectic() {
        let rows = [
            row(25.0, 10.0, 5.0, "NaCl"),
            row(25.0, 8.0, 12.0, "NaCl+KCl"),
            row(25.0, 2.0, 20.0, "KCl"),
        ];
        let ds = SolubilityDataset::from_measurements(&rows, "NaCl+KCl").unwrap();

        assert_eq!(ds.groups.len(), 1);
        let group = &ds.groups[0];
        assert_eq!(group.temperature, Temperature(25.0));
        assert_eq!(group.points.len(), 3);

        let water: Vec<f64> = group.points.iter().map(|p| p.h2o).collect();
        assert_eq!(water, vec![85.0, 80.0, 78.0]);

        let eutectic = group.eutectic.expect("group should have an eutectic");
        assert_eq!((eutectic.nacl, eutectic.kcl, eutectic.h2o), (8.0, 12.0, 80.0));
    }

    #[test]
    fn group_order_follows_first_appearance() {
        let rows = [
            row(50.0, 10.0, 10.0, "NaCl"),
            row(25.0, 10.0, 10.0, "NaCl"),
            row(50.0, 11.0, 12.0, "KCl"),
        ];
        let ds = SolubilityDataset::from_measurements(&rows, "NaCl+KCl").unwrap();

        let temps: Vec<Temperature> = ds.groups.iter().map(|g| g.temperature).collect();
        assert_eq!(temps, vec![Temperature(50.0), Temperature(25.0)]);
        assert_eq!(ds.groups[0].points.len(), 2);
        assert_eq!(ds.groups[1].points.len(), 1);
        assert_eq!(ds.point_count(), 3);
    }

    #[test]
    fn group_without_label_has_no_eutectic() {
        let rows = [row(25.0, 10.0, 5.0, "NaCl"), row(25.0, 2.0, 20.0, "KCl")];
        let ds = SolubilityDataset::from_measurements(&rows, "NaCl+KCl").unwrap();
        assert!(ds.groups[0].eutectic.is_none());
    }

    #[test]
    fn duplicate_eutectic_row_is_an_error() {
        let rows = [
            row(25.0, 8.0, 12.0, "NaCl+KCl"),
            row(25.0, 9.0, 11.0, "NaCl+KCl"),
        ];
        let err = SolubilityDataset::from_measurements(&rows, "NaCl+KCl").unwrap_err();
        assert!(matches!(err, ModelError::DuplicateEutectic { .. }));
    }

    #[test]
    fn empty_input_yields_empty_dataset() {
        let ds = SolubilityDataset::from_measurements(&[], "NaCl+KCl").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.point_count(), 0);
    }

    #[test]
    fn temperature_display_drops_whole_degree_fraction() {
        assert_eq!(Temperature(25.0).to_string(), "25");
        assert_eq!(Temperature(22.5).to_string(), "22.5");
        assert_eq!(Temperature(-10.0).to_string(), "-10");
    }

    #[test]
    fn temperature_ordering_is_total() {
        let mut temps = vec![Temperature(75.0), Temperature(25.0), Temperature(50.0)];
        temps.sort();
        assert_eq!(
            temps,
            vec![Temperature(25.0), Temperature(50.0), Temperature(75.0)]
        );
    }
}
