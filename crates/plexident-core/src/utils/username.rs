// Username generation for new staff accounts.

/// Derive a login handle from a person's names: first letter of the
/// first given name, then the whole first surname, lowercased with
/// accents folded and anything outside `a-z0-9` dropped.
///
/// `generate_username("Ana María", "Sánchez García")` is `"asanchez"`.
/// Returns an empty string when either part is blank; the caller decides
/// what to do about that.
pub fn generate_username(nombres: &str, apellidos: &str) -> String {
    let first_name = nombres.split_whitespace().next().unwrap_or("");
    let first_surname = apellidos.split_whitespace().next().unwrap_or("");
    if first_name.is_empty() || first_surname.is_empty() {
        return String::new();
    }

    let initial = first_name.chars().take(1).filter_map(fold);
    let surname = first_surname.chars().filter_map(fold);
    initial.chain(surname).collect()
}

/// Lowercase, fold Spanish accented letters to their base, and drop
/// everything that is not `a-z0-9`.
fn fold(c: char) -> Option<char> {
    let lower = c.to_lowercase().next()?;
    let folded = match lower {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        other => other,
    };
    (folded.is_ascii_lowercase() || folded.is_ascii_digit()).then_some(folded)
}
