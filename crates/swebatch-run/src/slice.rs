//! Positional slice specifications (`start:stop[:step]`)
//!
//! Semantics follow ordinary sequence slicing: the range is half-open, negative
//! indices count from the end, out-of-range bounds are clamped, and omitted
//! bounds default to the ends of the sequence (which end depends on the sign
//! of the step).

use swebatch_core::{Result, SwebatchError};

/// Parsed slice specification
///
/// | text      | meaning                          |
/// |-----------|----------------------------------|
/// | `""`      | everything                       |
/// | `"5"`     | first five (`:5`)                |
/// | `"2:"`    | from index 2                     |
/// | `"-3:"`   | last three                       |
/// | `"::2"`   | every other element              |
/// | `"::-1"`  | everything, reversed             |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceSpec {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl SliceSpec {
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Ok(Self::default());
        }

        let parts: Vec<&str> = spec.split(':').collect();
        if parts.len() > 3 {
            return Err(SwebatchError::InvalidSlice(format!(
                "'{}' has more than three components",
                spec
            )));
        }

        let values = parts
            .iter()
            .map(|part| parse_bound(part, spec))
            .collect::<Result<Vec<_>>>()?;

        let slice = match values.as_slice() {
            [stop] => Self {
                stop: *stop,
                ..Self::default()
            },
            [start, stop] => Self {
                start: *start,
                stop: *stop,
                step: None,
            },
            [start, stop, step] => Self {
                start: *start,
                stop: *stop,
                step: *step,
            },
            _ => unreachable!("split yields between one and three parts here"),
        };

        if slice.step == Some(0) {
            return Err(SwebatchError::InvalidSlice(format!(
                "'{}' has a step of zero",
                spec
            )));
        }

        Ok(slice)
    }

    /// Normalized `(start, stop, step)` for a sequence of `len` elements
    ///
    /// For a negative step, `stop` may be `-1`, meaning "past the front".
    pub fn indices(&self, len: usize) -> (isize, isize, isize) {
        let len = len as isize;
        let step = self.step.unwrap_or(1);
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };

        let clamp = |index: isize| {
            if index < 0 {
                (index + len).max(lower)
            } else {
                index.min(upper)
            }
        };

        let start = self
            .start
            .map(clamp)
            .unwrap_or(if step > 0 { lower } else { upper });
        let stop = self
            .stop
            .map(clamp)
            .unwrap_or(if step > 0 { upper } else { lower });

        (start, stop, step)
    }

    /// Positions selected from a sequence of `len` elements, in output order
    pub fn positions(&self, len: usize) -> Vec<usize> {
        let (start, stop, step) = self.indices(len);
        let mut positions = Vec::new();
        let mut index = start;
        if step > 0 {
            while index < stop {
                positions.push(index as usize);
                match index.checked_add(step) {
                    Some(next) => index = next,
                    None => break,
                }
            }
        } else {
            while index > stop {
                positions.push(index as usize);
                match index.checked_add(step) {
                    Some(next) => index = next,
                    None => break,
                }
            }
        }
        positions
    }

    /// Apply the slice to `items`
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let positions = self.positions(items.len());
        let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
        positions
            .into_iter()
            .filter_map(|position| slots[position].take())
            .collect()
    }
}

impl std::str::FromStr for SliceSpec {
    type Err = SwebatchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for SliceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |v: Option<isize>| v.map(|v| v.to_string()).unwrap_or_default();
        write!(f, "{}:{}", show(self.start), show(self.stop))?;
        if let Some(step) = self.step {
            write!(f, ":{}", step)?;
        }
        Ok(())
    }
}

fn parse_bound(part: &str, spec: &str) -> Result<Option<isize>> {
    let part = part.trim();
    if part.is_empty() {
        return Ok(None);
    }
    part.parse::<isize>().map(Some).map_err(|_| {
        SwebatchError::InvalidSlice(format!("'{}' in '{}' is not an integer", part, spec))
    })
}
