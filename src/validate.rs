//! Semantic checks on loaded SAC content.
//!
//! These run on syntactically valid headers and report what a well-formed
//! file can still get wrong: a negative sample interval, out-of-range
//! flags or enums, stale data statistics and unset reference times.

use std::fmt;
use std::str::FromStr;

use crate::header::{
    ENUM_HEADERS, FLOAT_HEADERS, FNULL, INT_HEADERS, INULL, LOGICAL_HEADERS, idx,
};
use crate::record::{HeaderArrays, Samples};
use crate::{Result, SacError};

/// One named validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationTest {
    /// `delta` is non-negative.
    Delta,
    /// Logical headers are 0, 1 or null.
    Logicals,
    /// `depmin`, `depmax` and `depmen` match the data.
    DataHdrs,
    /// Enumerated headers hold accepted values or null.
    Enums,
    /// The `nz*` reference time is set and is a calendar time.
    RefTime,
    /// The header selected by `iztype` is set.
    RelTime,
    /// Every test above.
    All,
}

impl ValidationTest {
    /// The individual tests, in the order they run.
    pub const EVERY: [ValidationTest; 6] = [
        ValidationTest::Delta,
        ValidationTest::Logicals,
        ValidationTest::DataHdrs,
        ValidationTest::Enums,
        ValidationTest::RefTime,
        ValidationTest::RelTime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ValidationTest::Delta => "delta",
            ValidationTest::Logicals => "logicals",
            ValidationTest::DataHdrs => "data_hdrs",
            ValidationTest::Enums => "enums",
            ValidationTest::RefTime => "reftime",
            ValidationTest::RelTime => "reltime",
            ValidationTest::All => "all",
        }
    }
}

impl fmt::Display for ValidationTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValidationTest {
    type Err = SacError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "all" {
            return Ok(ValidationTest::All);
        }
        Self::EVERY
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| SacError::invalid_argument(format!("unrecognized validation test: {s}")))
    }
}

/// Run the requested checks against a header and its data.
///
/// Checks run in [`ValidationTest::EVERY`] order and stop at the first
/// failure, which is a content error. An empty test list, or `DataHdrs`
/// without data, is an invalid argument.
///
/// ```
/// use sac_rs::{HeaderArrays, ValidationTest, validate_content};
///
/// let mut header = HeaderArrays::new();
/// header.float[0] = -1.0; // delta
/// assert!(validate_content(&header, None, &[ValidationTest::Logicals]).is_ok());
/// assert!(validate_content(&header, None, &[ValidationTest::Delta]).is_err());
/// ```
pub fn validate_content(
    header: &HeaderArrays,
    data: Option<&Samples>,
    tests: &[ValidationTest],
) -> Result<()> {
    if tests.is_empty() {
        return Err(SacError::invalid_argument("no validation tests specified"));
    }
    let all = tests.contains(&ValidationTest::All);
    for test in ValidationTest::EVERY {
        if !all && !tests.contains(&test) {
            continue;
        }
        tracing::trace!(test = test.name(), "validating SAC content");
        match test {
            ValidationTest::Delta => check_delta(header)?,
            ValidationTest::Logicals => check_logicals(header)?,
            ValidationTest::DataHdrs => check_data_hdrs(header, data)?,
            ValidationTest::Enums => check_enums(header)?,
            ValidationTest::RefTime => {
                header.reference_time()?;
            }
            ValidationTest::RelTime => check_reltime(header)?,
            ValidationTest::All => {}
        }
    }
    Ok(())
}

/// [`validate_content`] with tests given by name, e.g. `"reftime"`.
///
/// A list naming `"all"` runs every test and ignores the other names.
pub fn validate_content_by_name<S: AsRef<str>>(
    header: &HeaderArrays,
    data: Option<&Samples>,
    tests: &[S],
) -> Result<()> {
    if tests.iter().any(|t| t.as_ref() == "all") {
        return validate_content(header, data, &[ValidationTest::All]);
    }
    let tests = tests
        .iter()
        .map(|t| t.as_ref().parse())
        .collect::<Result<Vec<ValidationTest>>>()?;
    validate_content(header, data, &tests)
}

fn check_delta(header: &HeaderArrays) -> Result<()> {
    let delta = header.delta();
    // NaN fails too.
    if !(delta >= 0.0) {
        return Err(SacError::content(format!(
            "header 'delta' must be >= 0, got {delta}"
        )));
    }
    Ok(())
}

fn check_logicals(header: &HeaderArrays) -> Result<()> {
    for name in LOGICAL_HEADERS {
        let value = header.int(name).unwrap_or(INULL);
        if !matches!(value, 0 | 1 | INULL) {
            return Err(SacError::content(format!(
                "header '{name}' must be 0, 1 or {INULL}, got {value}"
            )));
        }
    }
    Ok(())
}

fn check_data_hdrs(header: &HeaderArrays, data: Option<&Samples>) -> Result<()> {
    let values = match data {
        Some(samples) if !samples.is_empty() => samples.to_f32(),
        _ => return Err(SacError::MissingData),
    };
    // A NaN sample makes min and max NaN, which never match.
    let min = values.iter().copied().fold(f32::INFINITY, nan_min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, nan_max);
    let mean = pairwise_sum(&values) / values.len() as f32;

    let f = &header.float;
    if f[idx::DEPMIN] != min || f[idx::DEPMAX] != max || f[idx::DEPMEN] != mean {
        return Err(SacError::content(format!(
            "data headers don't match data array: depmin {} depmax {} depmen {} \
             vs data {min} {max} {mean}",
            f[idx::DEPMIN],
            f[idx::DEPMAX],
            f[idx::DEPMEN],
        )));
    }
    Ok(())
}

fn nan_min(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.min(b)
    }
}

fn nan_max(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.max(b)
    }
}

/// Single-precision pairwise summation, in the same association order as
/// numpy's float32 `sum`/`mean`, so `depmen` written by numpy compares
/// exactly.
fn pairwise_sum(values: &[f32]) -> f32 {
    const BLOCK: usize = 128;
    let n = values.len();
    if n < 8 {
        values.iter().fold(0.0, |acc, &v| acc + v)
    } else if n <= BLOCK {
        let mut r = [0f32; 8];
        r.copy_from_slice(&values[..8]);
        let whole = n - n % 8;
        for chunk in values[8..whole].chunks_exact(8) {
            for (acc, &v) in r.iter_mut().zip(chunk) {
                *acc += v;
            }
        }
        let mut sum = ((r[0] + r[1]) + (r[2] + r[3])) + ((r[4] + r[5]) + (r[6] + r[7]));
        for &v in &values[whole..] {
            sum += v;
        }
        sum
    } else {
        let mut half = n / 2;
        half -= half % 8;
        pairwise_sum(&values[..half]) + pairwise_sum(&values[half..])
    }
}

fn check_enums(header: &HeaderArrays) -> Result<()> {
    for &(name, _) in ENUM_HEADERS {
        let Some(value) = header.int(name) else {
            continue;
        };
        if !crate::header::is_valid_enum_int(name, value, true) {
            return Err(SacError::content(format!(
                "invalid enumerated value, '{name}': {value}"
            )));
        }
    }
    Ok(())
}

fn check_reltime(header: &HeaderArrays) -> Result<()> {
    let iztype = header.int[idx::IZTYPE];
    if !crate::header::is_valid_enum_int(INT_HEADERS[idx::IZTYPE], iztype, false) {
        return Err(SacError::content(format!("invalid iztype: {iztype}")));
    }
    // iunkn and iday carry no reference header.
    let reference = match iztype {
        9 => Some(idx::B),
        11 => Some(idx::O),
        12 => Some(idx::A),
        13..=22 => Some(idx::T0 + (iztype - 13) as usize),
        _ => None,
    };
    if let Some(i) = reference
        && header.float[i] == FNULL
    {
        return Err(SacError::content(format!(
            "reference header '{}' for iztype {iztype} not set",
            FLOAT_HEADERS[i]
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn check(header: &HeaderArrays, test: ValidationTest) -> Result<()> {
        validate_content(header, None, &[test])
    }

    fn with_reftime() -> HeaderArrays {
        let mut h = HeaderArrays::new();
        h.int[idx::NZYEAR..=idx::NZMSEC].copy_from_slice(&[2020, 100, 1, 2, 3, 4]);
        h
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "data_hdrs".parse::<ValidationTest>().unwrap(),
            ValidationTest::DataHdrs
        );
        assert_eq!("all".parse::<ValidationTest>().unwrap(), ValidationTest::All);
        let err = "bogus".parse::<ValidationTest>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        for t in ValidationTest::EVERY {
            assert_eq!(t.to_string().parse::<ValidationTest>().unwrap(), t);
        }
    }

    #[test]
    fn test_empty_and_unknown_lists() {
        let h = HeaderArrays::new();
        let err = validate_content(&h, None, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = validate_content_by_name(&h, None, &["delta", "nope"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_all_overrides_other_names() {
        let mut h = with_reftime();
        h.float[idx::DELTA] = 0.5;
        h.int[idx::IZTYPE] = 5; // iunkn
        h.float[idx::DEPMIN] = 2.0;
        h.float[idx::DEPMAX] = 2.0;
        h.float[idx::DEPMEN] = 2.0;
        let data = Samples::Float(vec![2.0]);
        let data = Some(&data);
        assert!(validate_content_by_name(&h, data, &["all", "bogus"]).is_ok());
        assert!(validate_content_by_name(&h, data, &["bogus", "all"]).is_ok());
    }

    #[test]
    fn test_delta() {
        let mut h = HeaderArrays::new();
        for (delta, ok) in [
            (0.0, true),
            (0.01, true),
            (1e6, true),
            (-0.5, false),
            (f32::NAN, false),
        ] {
            h.float[idx::DELTA] = delta;
            assert_eq!(check(&h, ValidationTest::Delta).is_ok(), ok, "{delta}");
        }
        h.float[idx::DELTA] = -1.0;
        assert_eq!(
            check(&h, ValidationTest::Delta).unwrap_err().kind(),
            ErrorKind::Content
        );
    }

    #[test]
    fn test_logicals() {
        let mut h = HeaderArrays::new();
        assert!(check(&h, ValidationTest::Logicals).is_ok());
        h.set_int("lovrok", INULL).unwrap();
        assert!(check(&h, ValidationTest::Logicals).is_ok());
        h.set_int("lpspol", 2).unwrap();
        let err = check(&h, ValidationTest::Logicals).unwrap_err();
        assert!(err.to_string().contains("lpspol"));
    }

    #[test]
    fn test_data_hdrs() {
        let data = Samples::Float(vec![1.0, 2.0, 6.0]);
        let mut h = HeaderArrays::new();
        h.float[idx::DEPMIN] = 1.0;
        h.float[idx::DEPMAX] = 6.0;
        h.float[idx::DEPMEN] = 3.0;
        let tests = [ValidationTest::DataHdrs];
        assert!(validate_content(&h, Some(&data), &tests).is_ok());

        h.float[idx::DEPMEN] = 3.1;
        let err = validate_content(&h, Some(&data), &tests).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Content);
    }

    #[test]
    fn test_data_hdrs_single_precision_mean() {
        // Header statistics as numpy computes them for float32 data.
        let data = Samples::Float(vec![1.062, 2.375, 3.688, 5.001, 6.314]);
        let mut h = HeaderArrays::new();
        h.float[idx::DEPMIN] = 1.062;
        h.float[idx::DEPMAX] = 6.314;
        h.float[idx::DEPMEN] = 3.6879997;
        let tests = [ValidationTest::DataHdrs];
        assert!(validate_content(&h, Some(&data), &tests).is_ok());
    }

    #[test]
    fn test_pairwise_sum_matches_block_order() {
        let short = [0.1f32, 0.2, 0.3];
        assert_eq!(pairwise_sum(&short), (0.1f32 + 0.2) + 0.3);

        let values: Vec<f32> = (0..20).map(|i| i as f32 * 0.1).collect();
        let mut r = [0f32; 8];
        for (i, &v) in values[..16].iter().enumerate() {
            r[i % 8] += v;
        }
        let mut want = ((r[0] + r[1]) + (r[2] + r[3])) + ((r[4] + r[5]) + (r[6] + r[7]));
        for &v in &values[16..] {
            want += v;
        }
        assert_eq!(pairwise_sum(&values), want);

        let long: Vec<f32> = (0..1000).map(|i| (i % 7) as f32).collect();
        assert_eq!(pairwise_sum(&long), long.iter().sum::<f32>());
    }

    #[test]
    fn test_data_hdrs_nan_sample_fails() {
        let data = Samples::Float(vec![1.0, f32::NAN, 3.0]);
        let mut h = HeaderArrays::new();
        h.float[idx::DEPMIN] = 1.0;
        h.float[idx::DEPMAX] = 3.0;
        h.float[idx::DEPMEN] = 2.0;
        let tests = [ValidationTest::DataHdrs];
        let err = validate_content(&h, Some(&data), &tests).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Content);
    }

    #[test]
    fn test_data_hdrs_without_data() {
        let h = HeaderArrays::new();
        let tests = [ValidationTest::DataHdrs];
        let err = validate_content(&h, None, &tests).unwrap_err();
        assert!(matches!(err, SacError::MissingData));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let empty = Samples::Float(vec![]);
        assert!(matches!(
            validate_content(&h, Some(&empty), &tests),
            Err(SacError::MissingData)
        ));
    }

    #[test]
    fn test_enums() {
        let mut h = HeaderArrays::new();
        assert!(check(&h, ValidationTest::Enums).is_ok());
        h.set_int("iftype", 1).unwrap();
        h.set_int("idep", 5).unwrap();
        assert!(check(&h, ValidationTest::Enums).is_ok());
        h.set_int("iftype", 9).unwrap();
        let err = check(&h, ValidationTest::Enums).unwrap_err();
        assert!(err.to_string().contains("iftype"));
    }

    #[test]
    fn test_reftime() {
        assert!(check(&with_reftime(), ValidationTest::RefTime).is_ok());

        let mut h = with_reftime();
        h.int[idx::NZSEC] = INULL;
        let err = check(&h, ValidationTest::RefTime).unwrap_err();
        assert!(err.to_string().contains("null reference time"));

        let mut h = with_reftime();
        h.int[idx::NZJDAY] = 367;
        assert_eq!(
            check(&h, ValidationTest::RefTime).unwrap_err().kind(),
            ErrorKind::Content
        );
    }

    #[test]
    fn test_reltime() {
        let mut h = HeaderArrays::new();
        // null iztype
        assert!(check(&h, ValidationTest::RelTime).is_err());

        h.int[idx::IZTYPE] = 9; // ib
        assert!(check(&h, ValidationTest::RelTime).is_err());
        h.float[idx::B] = 0.0;
        assert!(check(&h, ValidationTest::RelTime).is_ok());

        h.int[idx::IZTYPE] = 15; // it2
        let err = check(&h, ValidationTest::RelTime).unwrap_err();
        assert!(err.to_string().contains("'t2'"));
        h.float[idx::T0 + 2] = 12.5;
        assert!(check(&h, ValidationTest::RelTime).is_ok());

        h.int[idx::IZTYPE] = 12; // ia
        assert!(check(&h, ValidationTest::RelTime).is_err());

        h.int[idx::IZTYPE] = 10; // iday
        assert!(check(&h, ValidationTest::RelTime).is_ok());

        h.int[idx::IZTYPE] = 7; // ivel, not a reference type
        assert!(check(&h, ValidationTest::RelTime).is_err());
    }

    #[test]
    fn test_all_expands() {
        let mut h = with_reftime();
        h.float[idx::DELTA] = 0.5;
        h.int[idx::IZTYPE] = 11;
        h.float[idx::O] = 0.0;
        h.float[idx::DEPMIN] = -1.0;
        h.float[idx::DEPMAX] = 1.0;
        h.float[idx::DEPMEN] = 0.0;
        let data = Samples::Float(vec![-1.0, 0.0, 1.0]);
        assert!(validate_content(&h, Some(&data), &[ValidationTest::All]).is_ok());
        // data_hdrs is part of "all"
        let err = validate_content_by_name(&h, None, &["all"]).unwrap_err();
        assert!(matches!(err, SacError::MissingData));
    }
}
