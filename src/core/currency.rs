//! Currency codes and the exchange-rate provider abstraction

use crate::core::error::ConversionError;
use crate::core::state::ConversionParams;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Cad,
    Inr,
}

impl Currency {
    pub fn all() -> &'static [Currency] {
        &[Currency::Usd, Currency::Eur, Currency::Cad, Currency::Inr]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Cad => "CAD",
            Currency::Inr => "INR",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "CAD" => Ok(Currency::Cad),
            "INR" => Ok(Currency::Inr),
            _ => Err(anyhow::anyhow!(
                "Unsupported currency: {} (expected one of USD, EUR, CAD, INR)",
                s
            )),
        }
    }
}

/// A converted amount, tied to the parameters that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub params: ConversionParams,
    pub value: f64,
    /// Date of the rates the service used, when it reports one.
    pub date: Option<NaiveDate>,
}

#[async_trait]
pub trait ConversionProvider: Send + Sync {
    /// Converts `params.amount` units of `params.from` into `params.to`.
    async fn convert(&self, params: &ConversionParams) -> Result<Conversion, ConversionError>;
}
