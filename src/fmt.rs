/// Dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let cents = amount(val.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((&cents, "00"));
    let groups: Vec<&str> = whole
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|g| std::str::from_utf8(g).unwrap_or_default())
        .collect();
    let sign = if val < 0.0 { "-" } else { "" };
    format!("{sign}${}.{frac}", groups.join(","))
}

/// Plain two-decimal amount as typed into the portal and used in file names.
pub fn amount(val: f64) -> String {
    format!("{val:.2}")
}
