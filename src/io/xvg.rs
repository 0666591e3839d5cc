use crate::io::error::Error;
use crate::model::sample::{SamplePair, SampleSet};
use std::io::BufRead;

const COMMENT_MARKERS: [char; 2] = ['#', '@'];

pub fn read<R: BufRead>(reader: R) -> Result<SampleSet, Error> {
    let mut samples = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let data = strip_comment(&line).trim();
        if data.is_empty() {
            continue;
        }
        samples.push(parse_row(data, line_no)?);
    }

    log::debug!("read {} sample pairs", samples.len());
    Ok(SampleSet { samples })
}

fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_MARKERS) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_row(data: &str, line_no: usize) -> Result<SamplePair, Error> {
    let fields: Vec<_> = data.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(Error::parse(
            line_no,
            format!("expected 2 columns, found {}", fields.len()),
        ));
    }
    let x = parse_value(fields[0], line_no)?;
    let y = parse_value(fields[1], line_no)?;
    Ok(SamplePair::new(x, y))
}

fn parse_value(token: &str, line_no: usize) -> Result<f64, Error> {
    let value = token
        .parse::<f64>()
        .map_err(|_| Error::parse(line_no, format!("invalid number '{token}'")))?;
    if !value.is_finite() {
        return Err(Error::parse(
            line_no,
            format!("value '{token}' is not finite"),
        ));
    }
    Ok(value)
}
