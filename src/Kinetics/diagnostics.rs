//! Observation hooks of the kinetics engines.
//!
//! The engines report every transient result (rate coefficients of a reaction, production rate of
//! a species, a Jacobian entry) to a [`KineticsDiagnostics`] sink. The default sink does nothing;
//! [`LogDiagnostics`] writes to the `log` facade and [`TableDiagnostics`] collects rows for a
//! prettytable report.
use crate::Kinetics::rate_coefficients::RateCoefficients;
use log::debug;
use prettytable::{Cell, Row, Table};
use std::cell::RefCell;
use std::collections::HashSet;

pub trait KineticsDiagnostics {
    fn rate_coefficients(&self, _reaction: usize, _T: f64, _coefficients: &RateCoefficients) {}
    fn production_rate(&self, _species: usize, _T: f64, _omega: f64) {}
    fn jacobian_entry(&self, _i: usize, _j: usize, _value: f64) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiagnostics;

impl KineticsDiagnostics for NoDiagnostics {}

/// debug-level log records, optionally only for some reactions
#[derive(Debug, Clone, Default)]
pub struct LogDiagnostics {
    pub reactions: Option<HashSet<usize>>,
}

impl LogDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn for_reactions(reactions: &[usize]) -> Self {
        Self {
            reactions: Some(reactions.iter().copied().collect()),
        }
    }
    fn watched(&self, reaction: usize) -> bool {
        self.reactions
            .as_ref()
            .map_or(true, |set| set.contains(&reaction))
    }
}

impl KineticsDiagnostics for LogDiagnostics {
    fn rate_coefficients(&self, reaction: usize, T: f64, rc: &RateCoefficients) {
        if self.watched(reaction) {
            debug!(
                "reaction {} at T = {}: kf = {:e}, kb = {:?}, Kc = {:?}, [M] = {:?}",
                reaction, T, rc.kf, rc.kb, rc.Kc, rc.M
            );
        }
    }
    fn production_rate(&self, species: usize, T: f64, omega: f64) {
        debug!("species {} at T = {}: omega = {:e}", species, T, omega);
    }
    fn jacobian_entry(&self, i: usize, j: usize, value: f64) {
        debug!("J[{}][{}] = {:e}", i, j, value);
    }
}

/// collects rate coefficients for a tabular report
#[derive(Debug, Default)]
pub struct TableDiagnostics {
    rows: RefCell<Vec<(usize, f64, RateCoefficients)>>,
}

impl TableDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }
    pub fn clear(&self) {
        self.rows.borrow_mut().clear();
    }
    /// `equations` gives the label of each reaction index
    pub fn table(&self, equations: &[String]) -> Table {
        let fmt = |x: Option<f64>| x.map_or("-".to_string(), |v| format!("{:.4e}", v));
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("reaction"),
            Cell::new("T, K"),
            Cell::new("kf"),
            Cell::new("kb"),
            Cell::new("Kc"),
            Cell::new("[M]"),
            Cell::new("dG, J/mol"),
        ]));
        for (r, T, rc) in self.rows.borrow().iter() {
            let label = equations.get(*r).cloned().unwrap_or_else(|| r.to_string());
            table.add_row(Row::new(vec![
                Cell::new(&label),
                Cell::new(&format!("{}", T)),
                Cell::new(&format!("{:.4e}", rc.kf)),
                Cell::new(&fmt(rc.kb)),
                Cell::new(&fmt(rc.Kc)),
                Cell::new(&fmt(rc.M)),
                Cell::new(&fmt(rc.deltas.map(|d| d.dG))),
            ]));
        }
        table
    }
    pub fn print(&self, equations: &[String]) {
        self.table(equations).printstd();
    }
}

impl KineticsDiagnostics for TableDiagnostics {
    fn rate_coefficients(&self, reaction: usize, T: f64, rc: &RateCoefficients) {
        self.rows.borrow_mut().push((reaction, T, *rc));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rc() -> RateCoefficients {
        RateCoefficients {
            kf: 2.0,
            kb: None,
            Kc: None,
            M: Some(1e-5),
            deltas: None,
        }
    }

    #[test]
    fn test_table_diagnostics_collects() {
        let sink = TableDiagnostics::new();
        assert!(sink.is_empty());
        sink.rate_coefficients(0, 1000.0, &rc());
        sink.rate_coefficients(1, 1000.0, &rc());
        sink.production_rate(0, 1000.0, 3.0);
        assert_eq!(sink.len(), 2);
        let table = sink.table(&["A=>B".to_string()]);
        // header plus two rows
        assert_eq!(table.len(), 3);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_log_filter() {
        let sink = LogDiagnostics::for_reactions(&[2]);
        assert!(sink.watched(2));
        assert!(!sink.watched(0));
        assert!(LogDiagnostics::new().watched(0));
        // must not panic without a logger
        sink.rate_coefficients(2, 500.0, &rc());
        NoDiagnostics.jacobian_entry(0, 0, 1.0);
    }
}
