//! Parsing for the form's input fields and interactive commands

use crate::core::currency::Currency;
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  amount <N>     set the amount (no value clears it)
  from <CODE>    set the source currency (USD, EUR, CAD, INR)
  to <CODE>      set the target currency
  show           redraw the converter
  help           show this help
  quit           exit";

/// Accepts what a numeric amount field would: empty, or a positive decimal.
/// The decimal is returned in canonical form, so `+5` becomes `5`.
pub fn parse_amount(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let value =
        Decimal::from_str(trimmed).with_context(|| format!("Invalid amount: {trimmed}"))?;
    if value <= Decimal::ZERO {
        bail!("Amount must be positive: {trimmed}");
    }
    Ok(value.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Amount(String),
    From(Currency),
    To(Currency),
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (name, arg) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, arg)| (name, arg.trim()));

        match name.to_lowercase().as_str() {
            "amount" | "a" => Ok(Command::Amount(parse_amount(arg)?)),
            "from" | "f" => Ok(Command::From(arg.parse()?)),
            "to" | "t" => Ok(Command::To(arg.parse()?)),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => bail!("Unknown command: {name} (type `help` for commands)"),
        }
    }
}
