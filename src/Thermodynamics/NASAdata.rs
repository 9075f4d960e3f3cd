use crate::Kinetics::units::R_J;
use crate::Thermodynamics::thermo_state::ThermoError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

fn Cp(t: f64, a: f64, b: f64, c: f64, d: f64, e: f64) -> f64 {
    R_J * (a + b * t + c * t.powi(2) + d * t.powi(3) + e * t.powi(4))
}
fn dh(t: f64, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> f64 {
    R_J * t
        * (a + b * t / 2.0
            + c * t.powi(2) / 3.0
            + d * t.powi(3) / 4.0
            + e * t.powi(4) / 5.0
            + f / t)
}
fn ds(t: f64, a: f64, b: f64, c: f64, d: f64, e: f64, g: f64) -> f64 {
    R_J * (a * t.ln() + b * t + c * t.powi(2) / 2.0 + d * t.powi(3) / 3.0 + e * t.powi(4) / 4.0 + g)
}

/// NASA7 record as stored in the thermo libraries.
///
/// `Cp` holds the temperature bounds followed by 7 coefficients per range:
/// `[T1, T2, a1..a7]` (9 values), `[T1, T2, T3, a1..a7, b1..b7]` (17), `[T1, T2, T3, T4, ...]` (25)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NASAinput {
    #[serde(default)]
    pub composition: Option<HashMap<String, f64>>,
    pub Cp: Vec<f64>,
    #[serde(default)]
    pub model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NASAdata {
    /// substance name, used in error messages
    pub name: String,
    /// data parsed from library
    pub input: NASAinput,
    /// NASA format 7 coefficients of the last extracted range
    pub coeffs: (f64, f64, f64, f64, f64, f64, f64),
    /// heat capacity value at T, J/(mol·K)
    pub Cp: f64,
    /// enthalpy value at T, J/mol
    pub dh: f64,
    /// entropy value at T, J/(mol·K)
    pub ds: f64,
}

impl NASAdata {
    ///initialize fields
    pub fn new(name: &str) -> Self {
        let input = NASAinput {
            Cp: Vec::new(),
            composition: None,
            model: String::new(),
        };
        Self {
            name: name.to_string(),
            input,
            coeffs: (0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            Cp: 0.0,
            dh: 0.0,
            ds: 0.0,
        }
    }
    pub fn from_input(name: &str, input: NASAinput) -> Result<Self, ThermoError> {
        let mut data = Self::new(name);
        data.input = input;
        data.temperature_bounds()?;
        Ok(data)
    }
    /// takes serde Value and parse it into structure
    pub fn from_serde(&mut self, serde: Value) -> Result<(), ThermoError> {
        self.input = serde_json::from_value(serde).map_err(|e| ThermoError::Deserialization {
            species: self.name.clone(),
            message: e.to_string(),
        })?;
        self.temperature_bounds()?;
        Ok(())
    }
    /// bounds of all temperature ranges, ascending
    pub fn temperature_bounds(&self) -> Result<&[f64], ThermoError> {
        let len = self.input.Cp.len();
        if len < 9 || (len - 1) % 8 != 0 {
            return Err(ThermoError::InvalidTemperatureRange(self.name.clone()));
        }
        let n_ranges = (len - 1) / 8;
        let bounds = &self.input.Cp[..n_ranges + 1];
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ThermoError::InvalidTemperatureRange(self.name.clone()));
        }
        Ok(bounds)
    }
    /// upper validity bound of the polynomials
    pub fn T_max(&self) -> Result<f64, ThermoError> {
        let bounds = self.temperature_bounds()?;
        Ok(bounds[bounds.len() - 1])
    }

    /// coefficients valid at t; `t_min` is the lowest accepted temperature, the first range is
    /// used for everything between `t_min` and its upper bound
    pub fn coefficients_at(
        &self,
        t: f64,
        t_min: f64,
    ) -> Result<(f64, f64, f64, f64, f64, f64, f64), ThermoError> {
        let bounds = self.temperature_bounds()?;
        let n_ranges = bounds.len() - 1;
        let t_max = bounds[n_ranges];
        if !(t >= t_min && t <= t_max) {
            let range = format!("{} - {}", t_min, t_max);
            return Err(ThermoError::TemperatureOutOfRange {
                species: self.name.clone(),
                temperature: t,
                range,
            });
        }
        let i = bounds[1..]
            .iter()
            .position(|upper| t <= *upper)
            .unwrap_or(n_ranges - 1);
        let c = &self.input.Cp[n_ranges + 1 + 7 * i..n_ranges + 1 + 7 * (i + 1)];
        Ok((c[0], c[1], c[2], c[3], c[4], c[5], c[6]))
    }
    /// get the 7 constants of NASA7 format for concrete temperature
    pub fn extract_coefficients(&mut self, t: f64, t_min: f64) -> Result<(), ThermoError> {
        self.coeffs = self.coefficients_at(t, t_min)?;
        Ok(())
    }
    /// calculate heat capacity, enthalpy, and entropy with the extracted coefficients
    pub fn calculate_Cp_dH_dS(&mut self, t: f64) {
        let (a, b, c, d, e, f, g) = self.coeffs;
        self.Cp = Cp(t, a, b, c, d, e);
        self.dh = dh(t, a, b, c, d, e, f);
        self.ds = ds(t, a, b, c, d, e, g);
    }
    /// (Cp, H, S) at t without touching the stored state
    pub fn Cp_dH_dS_at(&self, t: f64, t_min: f64) -> Result<(f64, f64, f64), ThermoError> {
        let (a, b, c, d, e, f, g) = self.coefficients_at(t, t_min)?;
        Ok((
            Cp(t, a, b, c, d, e),
            dh(t, a, b, c, d, e, f),
            ds(t, a, b, c, d, e, g),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn co_data() -> NASAdata {
        // CO, GRI-Mech 3.0
        let value = json!({
            "Cp": [200.0, 1000.0, 3500.0,
                3.57953347, -6.1035368e-04, 1.01681433e-06, 9.07005884e-10, -9.04424499e-13, -1.4344086e+04, 3.50840928,
                2.71518561, 2.06252743e-03, -9.98825771e-07, 2.30053008e-10, -2.03647716e-14, -1.41518724e+04, 7.81868772],
            "composition": {"C": 1.0, "O": 1.0},
            "model": "NASA7"
        });
        let mut data = NASAdata::new("CO");
        data.from_serde(value).unwrap();
        data
    }

    #[test]
    fn test_new() {
        let nasa_data = NASAdata::new("X");
        assert_eq!(nasa_data.coeffs, (0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0));
        assert_eq!(nasa_data.Cp, 0.0);
        assert!(nasa_data.temperature_bounds().is_err());
    }

    #[test]
    fn test_extract_coefficients() {
        let mut nasa_data = NASAdata::new("X");
        nasa_data.input.Cp = vec![300.0, 1000.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert!(nasa_data.extract_coefficients(500.0, 273.0).is_ok());
        assert_eq!(nasa_data.coeffs, (1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0));
        // below the first bound but above the global lower limit
        assert!(nasa_data.extract_coefficients(280.0, 273.0).is_ok());
    }

    #[test]
    fn test_extract_coefficients_out_of_range() {
        let mut nasa_data = NASAdata::new("X");
        nasa_data.input.Cp = vec![300.0, 1000.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let result = nasa_data.extract_coefficients(1500.0, 273.0);
        assert!(matches!(
            result,
            Err(ThermoError::TemperatureOutOfRange {
                temperature: 1500.0,
                ..
            })
        ));
        assert!(nasa_data.extract_coefficients(250.0, 273.0).is_err());
    }

    #[test]
    fn test_range_selection() {
        let data = co_data();
        let low = data.coefficients_at(1000.0, 273.0).unwrap();
        assert_eq!(low.0, 3.57953347);
        let high = data.coefficients_at(1000.1, 273.0).unwrap();
        assert_eq!(high.0, 2.71518561);
        assert_eq!(data.T_max().unwrap(), 3500.0);
    }

    #[test]
    fn test_with_real_data() {
        let mut data = co_data();
        let (Cp, dh, ds) = data.Cp_dH_dS_at(298.15, 273.0).unwrap();
        // JANAF: Cp = 29.14 J/mol/K, dHf = -110.53 kJ/mol, S = 197.66 J/mol/K
        assert_relative_eq!(Cp, 29.14, epsilon = 0.1);
        assert_relative_eq!(dh, -110.53e3, epsilon = 100.0);
        assert_relative_eq!(ds, 197.66, epsilon = 0.2);
        data.extract_coefficients(298.15, 273.0).unwrap();
        data.calculate_Cp_dH_dS(298.15);
        assert_relative_eq!(data.Cp, Cp, epsilon = 1e-12);
        assert_relative_eq!(data.dh, dh, epsilon = 1e-9);
        assert_relative_eq!(data.ds, ds, epsilon = 1e-12);
    }
}
