//v 0.1.0
// Rate constant laws: modified Arrhenius expression and the fall-off blending functions
// (Lindemann, TROE, SRI) for pressure dependent reactions.
use crate::Kinetics::kinetics_errors::ConfigurationError;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::f64;

/////////////////////////ELEMENTARY KINETICS///////////////////////////////////////////////////////////////
/// modified Arrhenius form  A*T^n*exp(-E/(R*T))
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Arrhenius {
    /// pre-exponential factor, units follow the molecularity of the reaction
    pub A: f64,
    /// temperature exponent
    pub n: f64,
    /// activation energy in the energy unit of the mechanism
    pub E: f64,
}

impl Arrhenius {
    pub fn new(A: f64, n: f64, E: f64) -> Self {
        Self { A, n, E }
    }
    /// from the library representation [A, n, E]
    pub fn from_vec(Arrenius: &[f64], equation: &str) -> Result<Self, ConfigurationError> {
        match Arrenius {
            [A, n, E] => Ok(Self::new(*A, *n, *E)),
            _ => Err(ConfigurationError::InvalidRateParameters {
                equation: equation.to_string(),
                what: format!(
                    "Arrhenius parameters must be [A, n, E], got {} values",
                    Arrenius.len()
                ),
            }),
        }
    }
    /// R is the gas constant in the unit of E
    pub fn K_const(&self, T: f64, R: f64) -> f64 {
        self.A * T.powf(self.n) * f64::exp(-self.E / (R * T))
    }
    /// symbolic rate constant as a function of the temperature expression T
    pub fn K_expr(&self, T: Expr, R: f64) -> Expr {
        let A = Expr::Const(self.A);
        let n = Expr::Const(self.n);
        let E = Expr::Const(self.E);
        let k0 = A * T.clone().pow(n);
        k0 * (-E / (Expr::Const(R) * T)).exp()
    }
}
/////////////////////////FALLOFF KINETICS///////////////////////////////////////////////////////////////
/// broadening factor F of the fall-off curve k = k_inf * (Pr/(1+Pr)) * F
#[enum_dispatch]
pub trait Broadening {
    fn F(&self, T: f64, P_r: f64) -> f64;
}

/// F = 1
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Lindemann;

impl Broadening for Lindemann {
    fn F(&self, _T: f64, _P_r: f64) -> f64 {
        1.0
    }
}

/// TROE form with parameters alpha, T***, T* and optional T**
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Troe {
    pub alpha: f64,
    pub T3: f64,
    pub T1: f64,
    pub T2: Option<f64>,
}

impl Troe {
    /// from the library representation [alpha, T***, T*] or [alpha, T***, T*, T**]
    pub fn from_vec(troe: &[f64], equation: &str) -> Result<Self, ConfigurationError> {
        match troe {
            [alpha, T3, T1] => Ok(Self {
                alpha: *alpha,
                T3: *T3,
                T1: *T1,
                T2: None,
            }),
            [alpha, T3, T1, T2] => Ok(Self {
                alpha: *alpha,
                T3: *T3,
                T1: *T1,
                T2: Some(*T2),
            }),
            _ => Err(ConfigurationError::InvalidRateParameters {
                equation: equation.to_string(),
                what: format!("TROE needs 3 or 4 parameters, got {}", troe.len()),
            }),
        }
    }
    pub fn F_cent(&self, T: f64) -> f64 {
        let mut F_c = (1.0 - self.alpha) * f64::exp(-T / self.T3) + self.alpha * f64::exp(-T / self.T1);
        if let Some(T2) = self.T2 {
            F_c += f64::exp(-T2 / T);
        }
        F_c
    }
}

impl Broadening for Troe {
    fn F(&self, T: f64, P_r: f64) -> f64 {
        if P_r <= 0.0 {
            // log10(0): the rate vanishes anyway
            return 1.0;
        }
        let F_c = self.F_cent(T);
        let C: f64 = -0.4 - 0.67 * F_c.ln();
        let N: f64 = 0.75 - 1.27 * F_c.ln();
        let lg_P = P_r.log10() + C;
        let f_1: f64 = lg_P / (N - 0.14 * lg_P);
        let log_F = F_c.log10() / (1.0 + f_1.powi(2));
        10.0_f64.powf(log_F)
    }
}

/// SRI form with parameters a, b, c and optional d, e
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Sri {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
}

impl Sri {
    /// from the library representation [a, b, c] or [a, b, c, d, e]
    pub fn from_vec(sri: &[f64], equation: &str) -> Result<Self, ConfigurationError> {
        match sri {
            [a, b, c] => Ok(Self {
                a: *a,
                b: *b,
                c: *c,
                d: 1.0,
                e: 0.0,
            }),
            [a, b, c, d, e] => Ok(Self {
                a: *a,
                b: *b,
                c: *c,
                d: *d,
                e: *e,
            }),
            _ => Err(ConfigurationError::InvalidRateParameters {
                equation: equation.to_string(),
                what: format!("SRI needs 3 or 5 parameters, got {}", sri.len()),
            }),
        }
    }
}

impl Broadening for Sri {
    fn F(&self, T: f64, P_r: f64) -> f64 {
        if P_r <= 0.0 {
            return self.d * T.powf(self.e);
        }
        let X = 1.0 / (1.0 + P_r.ln().powi(2));
        self.d * (self.a * f64::exp(-self.b / T) + f64::exp(-T / self.c)).powf(X) * T.powf(self.e)
    }
}

#[enum_dispatch(Broadening)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FalloffBlending {
    Lindemann(Lindemann),
    Troe(Troe),
    Sri(Sri),
}

/// pressure dependence of a fall-off reaction; the high pressure limit is the Arrhenius
/// triple of the reaction itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Falloff {
    pub low: Arrhenius,
    pub blending: FalloffBlending,
}

impl Falloff {
    /// k = k_inf * (Pr/(1+Pr)) * F, Pr = k0*[M]/k_inf
    pub fn K_const(&self, high: &Arrhenius, T: f64, M: f64, R: f64) -> f64 {
        let K_inf = high.K_const(T, R);
        let K0 = self.low.K_const(T, R);
        let P_r = K0 * M / K_inf;
        let F = self.blending.F(T, P_r);
        K_inf * (P_r / (1.0 + P_r)) * F
    }
}

/// how the rate constant of a reaction depends on T and pressure
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FalloffKind {
    SimpleArrhenius,
    Falloff(Falloff),
}
