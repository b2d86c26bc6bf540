//! Sprite-frame name patterns such as `run_%d.png`.
//!
//! A pattern holds exactly one integer placeholder: `%d` (or `%i`), with an
//! optional `0` flag and field width (`%3d`, `%03d`). `%%` is a literal `%`.

use std::ops::RangeInclusive;

use crate::error::{ResourceError, ResourceResult};

/// Widest field a placeholder may request.
pub const MAX_FIELD_WIDTH: usize = 32;

/// A parsed frame-name pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePattern {
    prefix: String,
    suffix: String,
    zero_pad: bool,
    width: usize,
}

impl FramePattern {
    /// Parse a pattern, rejecting anything but a single integer placeholder.
    pub fn parse(pattern: &str) -> ResourceResult<Self> {
        let invalid = |reason| ResourceError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut placeholder: Option<(bool, usize)> = None;
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            let out = if placeholder.is_some() { &mut suffix } else { &mut prefix };
            if c != '%' {
                out.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                out.push('%');
                continue;
            }
            if placeholder.is_some() {
                return Err(invalid("more than one placeholder"));
            }

            let zero_pad = chars.next_if_eq(&'0').is_some();
            let mut width = 0usize;
            while let Some(digit) = chars.peek().and_then(|d| d.to_digit(10)) {
                width = width
                    .checked_mul(10)
                    .and_then(|w| w.checked_add(digit as usize))
                    .filter(|w| *w <= MAX_FIELD_WIDTH)
                    .ok_or_else(|| invalid("field width too large"))?;
                chars.next();
            }
            match chars.next() {
                Some('d') | Some('i') => placeholder = Some((zero_pad, width)),
                Some(_) => return Err(invalid("only integer placeholders are supported")),
                None => return Err(invalid("unterminated placeholder")),
            }
        }

        let (zero_pad, width) = placeholder.ok_or_else(|| invalid("missing integer placeholder"))?;
        Ok(Self {
            prefix,
            suffix,
            zero_pad,
            width,
        })
    }

    /// Substitute `index` into the pattern.
    pub fn format(&self, index: i32) -> String {
        let number = if self.zero_pad {
            format!("{:0width$}", index, width = self.width)
        } else {
            format!("{:>width$}", index, width = self.width)
        };
        format!("{}{}{}", self.prefix, number, self.suffix)
    }

    /// Names for every index in `range`, in order. Empty if the range is.
    pub fn expand(&self, range: RangeInclusive<i32>) -> impl Iterator<Item = String> + '_ {
        range.map(move |i| self.format(i))
    }
}

/// Expand `pattern` over one or more inclusive index ranges.
///
/// Ranges are concatenated in the order given.
pub fn expand_frame_names(
    pattern: &str,
    ranges: &[RangeInclusive<i32>],
) -> ResourceResult<Vec<String>> {
    let pattern = FramePattern::parse(pattern)?;
    Ok(ranges
        .iter()
        .flat_map(|range| pattern.expand(range.clone()))
        .collect())
}
