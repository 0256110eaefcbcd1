//! Default LGD by seniority

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seniority {
    SeniorSecured,
    SeniorUnsecured,
    Subordinated,
}

impl Seniority {
    pub fn default_lgd(self) -> f64 {
        match self {
            Seniority::SeniorSecured => 0.35,
            Seniority::SeniorUnsecured => 0.45,
            Seniority::Subordinated => 0.75,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace(['_', '-', ' '], "").as_str() {
            "seniorsecured" | "secured" => Some(Seniority::SeniorSecured),
            "seniorunsecured" | "unsecured" | "senior" => Some(Seniority::SeniorUnsecured),
            "subordinated" | "sub" | "junior" => Some(Seniority::Subordinated),
            _ => None,
        }
    }
}

impl Default for Seniority {
    fn default() -> Self {
        Seniority::SeniorUnsecured
    }
}
