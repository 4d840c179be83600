// Run summary domain model - parsed outcome counts of one test run
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static RUN_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Ran ([0-9]*) tests").expect("valid run count pattern"));
static FAILURES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"failures=([0-9]*)").expect("valid failures pattern"));
static ERRORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"errors=([0-9]*)").expect("valid errors pattern"));

/// Significant digits shown for the pass rate
pub const PASS_RATE_PRECISION: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("run text does not contain `Ran <n> tests`")]
    MissingRunCount,
    #[error("result text does not contain `failures=<n>`")]
    MissingFailures,
    #[error("result text does not contain `errors=<n>`")]
    MissingErrors,
    #[error("{field} value {value:?} is not a valid count")]
    InvalidNumber { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub count: u64,
    pub failures: u64,
    pub errors: u64,
}

impl RunSummary {
    pub fn new(count: u64, failures: u64, errors: u64) -> Self {
        Self {
            count,
            failures,
            errors,
        }
    }

    /// Parse the bodies of `run.txt` and `result.txt` into a summary.
    ///
    /// Only the first match of each pattern is used; anything else in the text
    /// is ignored.
    pub fn parse(run_text: &str, result_text: &str) -> Result<Self, ParseError> {
        let count = Self::parse_run_count(run_text)?;
        let failures = capture_count(&FAILURES, result_text, "failures")?
            .ok_or(ParseError::MissingFailures)?;
        let errors =
            capture_count(&ERRORS, result_text, "errors")?.ok_or(ParseError::MissingErrors)?;

        Ok(Self::new(count, failures, errors))
    }

    pub fn parse_run_count(run_text: &str) -> Result<u64, ParseError> {
        capture_count(&RUN_COUNT, run_text, "count")?.ok_or(ParseError::MissingRunCount)
    }

    /// Tests that neither failed nor errored. Negative when the upstream
    /// report breaks the `failures + errors <= count` convention.
    pub fn success_count(&self) -> i128 {
        self.count as i128 - self.failures as i128 - self.errors as i128
    }

    /// Raw pass rate percentage. `NaN` or infinite when `count` is zero.
    pub fn pass_rate(&self) -> f64 {
        100.0 * (1.0 - (self.failures as f64 + self.errors as f64) / self.count as f64)
    }

    /// Pass rate rounded to three significant digits, e.g. `70.0` or `NaN`.
    pub fn pass_rate_display(&self) -> String {
        to_precision(self.pass_rate(), PASS_RATE_PRECISION)
    }
}

fn capture_count(
    pattern: &Regex,
    text: &str,
    field: &'static str,
) -> Result<Option<u64>, ParseError> {
    let Some(captures) = pattern.captures(text) else {
        return Ok(None);
    };
    let raw = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    raw.parse::<u64>()
        .map(Some)
        .map_err(|_| ParseError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Format a number with `digits` significant digits, the way a browser's
/// `Number.prototype.toPrecision` does: plain notation while the exponent
/// lies in `-6..digits`, exponential notation (`1.23e+7`) otherwise.
pub fn to_precision(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", digits - 1, 0.0);
    }

    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };

    if exponent < -6 || exponent >= digits as i32 {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{mantissa}e{exp_sign}{}", exponent.abs());
    }

    let significand: String = mantissa.chars().filter(|c| *c != '.').collect();
    if exponent >= 0 {
        let split = exponent as usize + 1;
        let (integer, fraction) = significand.split_at(split);
        if fraction.is_empty() {
            format!("{sign}{integer}")
        } else {
            format!("{sign}{integer}.{fraction}")
        }
    } else {
        let zeros = "0".repeat((-exponent - 1) as usize);
        format!("{sign}0.{zeros}{significand}")
    }
}
