use crate::utils::error::{Result, VerifyError};

/// CSV text with leading single-cell comment rows, then a header and rows.
pub fn write_csv<I>(comments: &[String], header: &[&str], rows: I) -> Result<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    for comment in comments {
        writer.write_record([comment.as_str()])?;
    }
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|e| VerifyError::ProcessingError {
            message: format!("Failed to finish CSV output: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| VerifyError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// `1234567` -> `1,234,567`.
pub fn thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Fixed decimals with grouped integer part: `76634.38`.
pub fn thousands_f64(x: f64, decimals: usize) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let formatted = format!("{:.*}", decimals, x.abs());
    let (whole, frac) = formatted
        .split_once('.')
        .map_or((formatted.as_str(), None), |(w, f)| (w, Some(f)));
    let sign = if x < 0.0 { "-" } else { "" };
    match frac {
        Some(frac) => format!("{}{}.{}", sign, group_digits(whole), frac),
        None => format!("{}{}", sign, group_digits(whole)),
    }
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
