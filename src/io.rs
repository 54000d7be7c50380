use crate::scenario::{Cost, Scenario};
use std::convert::TryFrom;
use std::io::{BufRead, Error, ErrorKind};

/// Reads a scenario from the plain cost-matrix format: a line with the
/// city count `n`, then `n` whitespace-separated rows of `n` entries each.
/// `inf` or `-` marks a missing edge; lines starting with `#` are skipped.
pub struct MatrixReader<T: BufRead>(pub T);

impl<T: BufRead> TryFrom<MatrixReader<T>> for Scenario {
    type Error = std::io::Error;

    fn try_from(reader: MatrixReader<T>) -> Result<Self, Self::Error> {
        let mut order: Option<usize> = None;
        let mut rows: Vec<Vec<Cost>> = Vec::new();

        for line in reader.0.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match order {
                None => {
                    let n = line.parse::<usize>().map_err(|_| {
                        Error::new(ErrorKind::InvalidInput, "invalid city count")
                    })?;
                    order = Some(n);
                    rows.reserve(n);
                }
                Some(n) => {
                    if rows.len() == n {
                        return Err(Error::new(
                            ErrorKind::InvalidInput,
                            "more matrix rows than cities",
                        ));
                    }
                    let row = line
                        .split_whitespace()
                        .map(parse_cost)
                        .collect::<Result<Vec<_>, _>>()?;
                    rows.push(row);
                }
            }
        }

        match order {
            Some(n) if rows.len() == n => Scenario::from_matrix(rows)
                .map_err(|e| Error::new(ErrorKind::InvalidInput, e.to_string())),
            Some(_) => Err(Error::new(
                ErrorKind::InvalidInput,
                "fewer matrix rows than cities",
            )),
            None => Err(Error::new(ErrorKind::InvalidInput, "empty scenario input")),
        }
    }
}

fn parse_cost(token: &str) -> Result<Cost, Error> {
    match token {
        "inf" | "-" => Ok(Cost::INFINITY),
        _ => token
            .parse::<Cost>()
            .ok()
            .filter(|c| c.is_finite() && *c >= 0.0)
            .ok_or_else(|| Error::new(ErrorKind::InvalidInput, "invalid cost entry")),
    }
}
