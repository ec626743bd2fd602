//! Input state for a single conversion form

use crate::core::currency::{Conversion, Currency};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionParams {
    /// Amount as typed into the form. Empty means no input yet.
    pub amount: String,
    pub from: Currency,
    pub to: Currency,
}

impl ConversionParams {
    pub fn new(amount: impl Into<String>, from: Currency, to: Currency) -> Self {
        ConversionParams {
            amount: amount.into(),
            from,
            to,
        }
    }

    /// A request is only warranted for a non-empty amount between two different currencies.
    pub fn is_valid(&self) -> bool {
        !self.amount.trim().is_empty() && self.from != self.to
    }

    pub fn pair(&self) -> String {
        format!("{}{}", self.from, self.to)
    }
}

/// What the output region shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputView {
    Loading,
    Result { currency: Currency, value: f64 },
    Placeholder,
}

impl Display for OutputView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputView::Loading => write!(f, "Converting..."),
            OutputView::Result { currency, value } => write!(f, "{currency} {value}"),
            OutputView::Placeholder => write!(f, "Enter an amount to see results"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputState {
    params: ConversionParams,
    result: Option<Conversion>,
    loading: bool,
}

impl InputState {
    pub fn new(from: Currency, to: Currency) -> Self {
        InputState {
            params: ConversionParams::new("", from, to),
            result: None,
            loading: false,
        }
    }

    pub fn params(&self) -> &ConversionParams {
        &self.params
    }

    pub fn amount(&self) -> &str {
        &self.params.amount
    }

    pub fn from(&self) -> Currency {
        self.params.from
    }

    pub fn to(&self) -> Currency {
        self.params.to
    }

    pub fn result(&self) -> Option<&Conversion> {
        self.result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns `true` when the amount actually changed.
    pub fn set_amount(&mut self, amount: impl Into<String>) -> bool {
        let amount = amount.into();
        if self.params.amount == amount {
            return false;
        }
        self.params.amount = amount;
        true
    }

    pub fn set_from(&mut self, from: Currency) -> bool {
        if self.params.from == from {
            return false;
        }
        self.params.from = from;
        true
    }

    pub fn set_to(&mut self, to: Currency) -> bool {
        if self.params.to == to {
            return false;
        }
        self.params.to = to;
        true
    }

    pub fn set_result(&mut self, result: Conversion) {
        self.result = Some(result);
    }

    pub fn clear_result(&mut self) {
        self.result = None;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn view(&self) -> OutputView {
        if self.loading {
            return OutputView::Loading;
        }
        match &self.result {
            Some(conversion) => OutputView::Result {
                currency: conversion.params.to,
                value: conversion.value,
            },
            None => OutputView::Placeholder,
        }
    }
}
