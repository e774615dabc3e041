// ── Display names ──
//
// Turns registry names like `MMM-SomeModule` into labels for cards and
// tables.

const MMM_PREFIX: &str = "MMM-";

/// Map a module name to a human-friendly label.
///
/// A few well-known modules get fixed labels. Everything else loses the
/// `MMM-` prefix and has a space inserted at each lower→upper boundary.
pub fn normalize_module_name(name: &str) -> String {
    match name {
        "MMM-AccuWeatherForecastDeluxe" => return "Weather".into(),
        "clock" => return "Clock".into(),
        "newsfeed" => return "News".into(),
        "compliments" => return "Compliments".into(),
        _ => {}
    }

    let base = base_module_name(name);
    let mut out = String::with_capacity(base.len() + 4);
    let mut prev_lower = false;
    for ch in base.chars() {
        if prev_lower && ch.is_ascii_uppercase() {
            out.push(' ');
        }
        prev_lower = ch.is_ascii_lowercase();
        out.push(ch);
    }
    out.trim().to_owned()
}

/// Returns `true` if the name carries the conventional `MMM-` prefix.
pub fn has_mmm_prefix(name: &str) -> bool {
    name.starts_with(MMM_PREFIX)
}

/// The name without its `MMM-` prefix.
pub fn base_module_name(name: &str) -> &str {
    name.strip_prefix(MMM_PREFIX).unwrap_or(name)
}
