//! Name handling shared by the providers

/// Strip surrounding whitespace and a trailing dot, lowercase the rest.
pub fn normalize_domain_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Convert a fully qualified name to a name relative to `zone_name`.
///
/// - `"em123.mail.example.com"` + `"example.com"` -> `"em123.mail"`
/// - `"example.com"` + `"example.com"` -> `"@"`
///
/// Returns `None` when the name does not lie inside the zone.
pub fn full_name_to_relative(full_name: &str, zone_name: &str) -> Option<String> {
    let full = normalize_domain_name(full_name);
    let zone = normalize_domain_name(zone_name);

    if full == zone {
        Some("@".to_string())
    } else {
        full.strip_suffix(&format!(".{zone}"))
            .filter(|sub| !sub.is_empty())
            .map(str::to_string)
    }
}

/// Convert a relative name back to a fully qualified one.
///
/// - `"www"` + `"example.com"` -> `"www.example.com"`
/// - `"@"` + `"example.com"` -> `"example.com"`
pub fn relative_to_full_name(relative_name: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);
    if relative_name == "@" || relative_name.is_empty() {
        zone
    } else {
        format!("{relative_name}.{zone}")
    }
}

/// Split a TXT value into character strings of at most 255 bytes.
///
/// Splits only on character boundaries; an empty value yields one empty string.
pub fn split_txt_value(value: &str) -> Vec<String> {
    const MAX_CHUNK: usize = 255;

    if value.len() <= MAX_CHUNK {
        return vec![value.to_string()];
    }

    let mut chunks = Vec::new();
    let mut rest = value;
    while !rest.is_empty() {
        let mut end = rest.len().min(MAX_CHUNK);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (head, tail) = rest.split_at(end);
        chunks.push(head.to_string());
        rest = tail;
    }
    chunks
}
