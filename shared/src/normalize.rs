//! Serial number normalization
//!
//! Printed labels and hand-typed input disagree on case and spacing, so every
//! comparison runs over the normalized form: leading/trailing and interior
//! whitespace dropped, everything uppercased. The same rule runs on the
//! server, which is what makes the offline comparison a faithful stand-in.

/// Normalize a raw serial for comparison.
///
/// Idempotent: `normalize_serial(&normalize_serial(s)) == normalize_serial(s)`.
pub fn normalize_serial(raw: &str) -> String {
    raw.split_whitespace().collect::<String>().to_uppercase()
}
