/// Human-readable formatting for the console summary.
///
/// Table rows always carry exact `u64` byte counts; these helpers exist
/// only for what gets printed to a terminal.

const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Format a byte count with binary units (1 KB = 1024 B).
///
/// Below 1 KB the exact count is shown. KB and MB get one decimal place,
/// GB and above get two, since module trees rarely reach those sizes and
/// the extra digit is what tells two large modules apart.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit >= 2 {
        format!("{value:.2} {}", UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Format a count with `,` thousands separators.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
