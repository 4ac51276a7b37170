//! Benchmark environment overlay
//!
//! uperf reads its profile parameters from the process environment. The
//! harness never touches its own environment; it builds this overlay once
//! and applies it to each child it spawns.

use crate::common::EnvironmentConfig;

/// Names of every variable the overlay sets, in export order
pub const VARIABLES: [&str; 12] = [
    "h", "h1", "h2", "h3", "h4", "nthr", "conn", "proto", "iter", "size", "t", "rate",
];

/// Immutable set of variables exported to every benchmark invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchEnvironment {
    vars: Vec<(&'static str, String)>,
}

impl BenchEnvironment {
    /// Build the overlay from configured values
    pub fn from_config(config: &EnvironmentConfig) -> Self {
        let values = [
            &config.h,
            &config.h1,
            &config.h2,
            &config.h3,
            &config.h4,
            &config.nthr,
            &config.conn,
            &config.proto,
            &config.iter,
            &config.size,
            &config.t,
            &config.rate,
        ];

        Self {
            vars: VARIABLES
                .iter()
                .zip(values)
                .map(|(name, value)| (*name, value.clone()))
                .collect(),
        }
    }

    /// Iterate `(name, value)` pairs in export order
    pub fn vars(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.vars.iter().map(|(name, value)| (*name, value.as_str()))
    }

    /// Look up a single variable
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value.as_str())
    }
}

impl Default for BenchEnvironment {
    fn default() -> Self {
        Self::from_config(&EnvironmentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_lab_setup() {
        let env = BenchEnvironment::default();
        let vars: Vec<_> = env.vars().collect();

        assert_eq!(
            vars,
            vec![
                ("h", "frost"),
                ("h1", "frost"),
                ("h2", "frost"),
                ("h3", "frost"),
                ("h4", "frost"),
                ("nthr", "10"),
                ("conn", "10"),
                ("proto", "tcp"),
                ("iter", "100"),
                ("size", "1400"),
                ("t", "10s"),
                ("rate", "1000"),
            ]
        );
    }

    #[test]
    fn test_values_are_not_validated() {
        let config = EnvironmentConfig {
            nthr: "lots".to_string(),
            t: String::new(),
            ..EnvironmentConfig::default()
        };
        let env = BenchEnvironment::from_config(&config);

        assert_eq!(env.get("nthr"), Some("lots"));
        assert_eq!(env.get("t"), Some(""));
        assert_eq!(env.get("PATH"), None);
    }
}
