//! Serde default functions backed by environment variables.
//!
//! The macro shapes follow godfig's `env_default!` family; parsing is shared
//! through [`parse_env_var`].

use std::str::FromStr;

/// Reads `name` and parses it, treating unset, empty and unparsable values alike.
pub fn parse_env_var<T: FromStr>(name: &str) -> Option<T> {
	std::env::var(name).ok().filter(|value| !value.trim().is_empty())?.trim().parse().ok()
}

/// Declares a serde default function reading an environment variable.
/// With a fallback the function returns it when the variable is absent,
/// without one it returns an `Option`.
#[macro_export]
macro_rules! env_default {
	($name:ident, $env:expr, $ty:ty, $default:expr) => {
		pub fn $name() -> $ty {
			$crate::macros::parse_env_var::<$ty>($env).unwrap_or_else(|| $default)
		}
	};
	($name:ident, $env:expr, $ty:ty) => {
		pub fn $name() -> Option<$ty> {
			$crate::macros::parse_env_var::<$ty>($env)
		}
	};
}

/// Like [`env_default!`], with the variable named after the function in upper case.
#[macro_export]
macro_rules! env_short_default {
	($name:ident, $ty:ty, $default:expr) => {
		pub fn $name() -> $ty {
			$crate::macros::parse_env_var::<$ty>(&stringify!($name).to_uppercase())
				.unwrap_or_else(|| $default.into())
		}
	};
}

#[cfg(test)]
mod tests {
	use super::parse_env_var;

	#[test]
	fn test_parse_env_var() {
		std::env::set_var("TEST_PREDICTION_PARSE_ENV", " 8545 ");
		assert_eq!(parse_env_var::<u16>("TEST_PREDICTION_PARSE_ENV"), Some(8545));

		std::env::set_var("TEST_PREDICTION_PARSE_ENV", "");
		assert_eq!(parse_env_var::<String>("TEST_PREDICTION_PARSE_ENV"), None);

		std::env::set_var("TEST_PREDICTION_PARSE_ENV", "eighty");
		assert_eq!(parse_env_var::<u16>("TEST_PREDICTION_PARSE_ENV"), None);

		std::env::remove_var("TEST_PREDICTION_PARSE_ENV");
		assert_eq!(parse_env_var::<u16>("TEST_PREDICTION_PARSE_ENV"), None);
	}

	#[test]
	fn test_env_default_with_env() {
		std::env::set_var("TEST_PREDICTION_ENV_DEFAULT_1", "42");

		env_default!(my_env, "TEST_PREDICTION_ENV_DEFAULT_1", i32);
		assert_eq!(my_env(), Some(42));

		env_default!(my_env_with_default, "TEST_PREDICTION_ENV_DEFAULT_1", i32, 0);
		assert_eq!(my_env_with_default(), 42);
	}

	#[test]
	fn test_env_default_without_env() {
		std::env::remove_var("TEST_PREDICTION_ENV_DEFAULT_2");

		env_default!(my_env, "TEST_PREDICTION_ENV_DEFAULT_2", i32);
		assert_eq!(my_env(), None);

		env_default!(my_env_with_default, "TEST_PREDICTION_ENV_DEFAULT_2", i32, 7);
		assert_eq!(my_env_with_default(), 7);
	}

	#[test]
	fn test_env_short_default() {
		env_short_default!(prediction_short_env, u64, 5u64);
		std::env::remove_var("PREDICTION_SHORT_ENV");
		assert_eq!(prediction_short_env(), 5);

		std::env::set_var("PREDICTION_SHORT_ENV", "12");
		assert_eq!(prediction_short_env(), 12);

		std::env::set_var("PREDICTION_SHORT_ENV", "not a number");
		assert_eq!(prediction_short_env(), 5);
	}
}
