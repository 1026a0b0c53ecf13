//! Argentine peso formatting (`es-AR` conventions: `.` groups thousands, `,` marks decimals).

/// Options for [`format_currency`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrencyFormat {
	/// Prefixes the `$` symbol.
	pub include_symbol: bool,
	/// Fraction digits always shown.
	pub min_fraction_digits: usize,
	/// Fraction digits shown at most; the amount is rounded to this precision.
	pub max_fraction_digits: usize,
}
impl CurrencyFormat {
	/// Omits the `$` symbol.
	pub fn without_symbol(mut self) -> Self {
		self.include_symbol = false;

		self
	}

	/// Sets the fraction digit range; `max` is raised to `min` when smaller.
	pub fn fraction_digits(mut self, min: usize, max: usize) -> Self {
		self.min_fraction_digits = min;
		self.max_fraction_digits = max.max(min);

		self
	}
}
impl Default for CurrencyFormat {
	fn default() -> Self {
		Self { include_symbol: true, min_fraction_digits: 2, max_fraction_digits: 2 }
	}
}

/// Formats `amount` as pesos, e.g. `$1.234,50`.
pub fn format_currency(amount: f64, format: CurrencyFormat) -> String {
	let number = format_number(amount, format.min_fraction_digits, format.max_fraction_digits);

	if format.include_symbol { format!("${number}") } else { number }
}

/// Formats `amount` compactly: `$950`, `$1,5K`, `$2M`.
pub fn format_compact_currency(amount: f64) -> String {
	if amount < 1_000. {
		format!("${}", format_number(amount, 0, 3))
	} else if amount < 1_000_000. {
		format!("${}K", format_number(amount / 1_000., 0, 1))
	} else {
		format!("${}M", format_number(amount / 1_000_000., 0, 1))
	}
}

fn format_number(amount: f64, min_fraction_digits: usize, max_fraction_digits: usize) -> String {
	let rounded = format!("{:.*}", max_fraction_digits, amount.abs());
	let (integer, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
	let keep = fraction.trim_end_matches('0').len().max(min_fraction_digits);
	let fraction = &fraction[..keep.min(fraction.len())];
	let mut out = String::with_capacity(rounded.len() + integer.len() / 3 + 1);

	if amount.is_sign_negative() && rounded.bytes().any(|b| matches!(b, b'1'..=b'9')) {
		out.push('-');
	}

	for (index, digit) in integer.chars().enumerate() {
		if index > 0 && (integer.len() - index) % 3 == 0 {
			out.push('.');
		}

		out.push(digit);
	}

	if !fraction.is_empty() {
		out.push(',');
		out.push_str(fraction);
	}

	out
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn full_format_groups_thousands() {
		assert_eq!(format_currency(1_234_567.891, CurrencyFormat::default()), "$1.234.567,89");
		assert_eq!(format_currency(0., CurrencyFormat::default()), "$0,00");
		assert_eq!(format_currency(-15.5, CurrencyFormat::default()), "$-15,50");

		let bare = CurrencyFormat::default().without_symbol().fraction_digits(0, 0);

		assert_eq!(format_currency(1500., bare), "1.500");
		assert_eq!(format_currency(2.5, CurrencyFormat::default().fraction_digits(0, 2)), "$2,5");
	}

	#[test]
	fn compact_format_scales_units() {
		assert_eq!(format_compact_currency(950.), "$950");
		assert_eq!(format_compact_currency(1_500.), "$1,5K");
		assert_eq!(format_compact_currency(12_000.), "$12K");
		assert_eq!(format_compact_currency(2_000_000.), "$2M");
		assert_eq!(format_compact_currency(2_460_000.), "$2,5M");
	}
}
