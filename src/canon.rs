// Name canonicalization: the single normalization authority for the crate.
//
// Condition matching, chemistry grouping and the multiplayer used-name set
// all compare strings through `canonicalize`, so "Netherlands",
// "The Netherlands" and "the netherlands" end up as the same key.

/// Canonical form of a club/league/nationality/player name.
///
/// Trims, lowercases, drops one leading "the " article and folds accented
/// Latin letters to their base letter ("Atlético" -> "atletico"). Combining
/// marks are dropped so already-decomposed input folds the same way.
pub fn canonicalize(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let stripped = lowered
        .strip_prefix("the ")
        .map(str::trim_start)
        .unwrap_or(&lowered);
    stripped
        .chars()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .map(fold_diacritic)
        .collect()
}

/// Fold a lowercase precomposed Latin letter with a diacritic to its base
/// letter. Letters without a combining-mark decomposition (ø, ß, æ, ł)
/// pass through unchanged.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' => 'h',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' | 'ș' => 's',
        'ţ' | 'ť' | 'ț' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}
