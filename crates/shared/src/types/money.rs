//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` everywhere; this module only adds
//! rounding and display on top.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Smallest difference between two amounts that is treated as real money.
///
/// Balances closer than this to zero are rounding noise.
pub const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Display currency of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    #[default]
    Usd,
    /// Euro
    Eur,
    /// Mexican Peso
    Mxn,
    /// Colombian Peso
    Cop,
    /// Argentine Peso
    Ars,
    /// Chilean Peso
    Clp,
}

impl Currency {
    /// Symbol printed before an amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eur => "€",
            Self::Usd | Self::Mxn | Self::Cop | Self::Ars | Self::Clp => "$",
        }
    }

    /// Decimal places shown for this currency.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::Clp => 0,
            Self::Usd | Self::Eur | Self::Mxn | Self::Cop | Self::Ars => 2,
        }
    }
}

/// Rounds to cents, half away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with the symbol and precision of `currency`, e.g.
/// `$50.00`, `-$12.50` or `€9.99`.
#[must_use]
pub fn format_in(amount: Decimal, currency: Currency) -> String {
    let dp = currency.minor_units();
    let rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = dp as usize;
    format!("{sign}{}{:.digits$}", currency.symbol(), rounded.abs())
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Mxn => "MXN",
            Self::Cop => "COP",
            Self::Ars => "ARS",
            Self::Clp => "CLP",
        };
        f.write_str(code)
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "MXN" => Ok(Self::Mxn),
            "COP" => Ok(Self::Cop),
            "ARS" => Ok(Self::Ars),
            "CLP" => Ok(Self::Clp),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case(dec!(50), "$50.00")]
    #[case(dec!(0.005), "$0.01")]
    #[case(dec!(1234.5), "$1234.50")]
    #[case(dec!(-12.5), "-$12.50")]
    #[case(dec!(-0.001), "$0.00")]
    fn test_format_dollars(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_in(amount, Currency::Usd), expected);
    }

    #[test]
    fn test_format_in_currency() {
        assert_eq!(format_in(dec!(9.99), Currency::Eur), "€9.99");
        assert_eq!(format_in(dec!(1500.6), Currency::Clp), "$1501");
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(dec!(33.335)), dec!(33.34));
        assert_eq!(round_cents(dec!(-33.335)), dec!(-33.34));
        assert_eq!(round_cents(dec!(10)), dec!(10));
    }

    #[test]
    fn test_cent_constant() {
        assert_eq!(CENT, dec!(0.01));
    }

    #[test]
    fn test_currency_round_trip() {
        for code in ["USD", "eur", "Mxn", "COP", "ARS", "CLP"] {
            let currency = Currency::from_str(code).unwrap();
            assert_eq!(currency.to_string(), code.to_uppercase());
        }
        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }
}
