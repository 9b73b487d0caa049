//! Light stemmers
//!
//! English follows Porter. The others strip common suffixes only; every form
//! of a word has to reduce to the same key, and queries run through the same
//! stemmer as documents.

/// English: Porter's algorithm, steps 1 through 5.
pub fn english(word: &str) -> String {
    if word.len() <= 2 || !word.is_ascii() {
        return word.to_string();
    }
    let mut w = word.to_string();
    step1a(&mut w);
    step1b(&mut w);
    step1c(&mut w);
    replace_suffix(&mut w, STEP2, 1);
    replace_suffix(&mut w, STEP3, 1);
    step4(&mut w);
    step5(&mut w);
    w
}

const STEP2: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("abli", "able"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
];

const STEP3: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

// Longer suffixes first: the first match decides
const STEP4: &[&str] = &[
    "ement", "ment", "ance", "ence", "able", "ible", "ant", "ent", "ism", "ate", "iti", "ous",
    "ive", "ize", "ion", "al", "er", "ic", "ou",
];

/// Plurals
fn step1a(w: &mut String) {
    if w.ends_with("sses") || w.ends_with("ies") {
        w.truncate(w.len() - 2);
    } else if w.ends_with("ss") {
        // caress
    } else if w.ends_with('s') {
        w.pop();
    }
}

/// Past tense and progressive
fn step1b(w: &mut String) {
    if w.ends_with("eed") {
        if measure(&w[..w.len() - 3]) > 0 {
            w.pop();
        }
        return;
    }
    let stem_len = if w.ends_with("ed") {
        w.len() - 2
    } else if w.ends_with("ing") {
        w.len() - 3
    } else {
        return;
    };
    if !has_vowel(&w[..stem_len]) {
        return;
    }
    w.truncate(stem_len);

    if w.ends_with("at") || w.ends_with("bl") || w.ends_with("iz") {
        w.push('e');
    } else if ends_double_consonant(w) {
        if !matches!(w.as_bytes().last(), Some(b'l' | b's' | b'z')) {
            w.pop();
        }
    } else if measure(w) == 1 && ends_cvc(w) {
        w.push('e');
    }
}

fn step1c(w: &mut String) {
    if w.ends_with('y') && has_vowel(&w[..w.len() - 1]) {
        w.pop();
        w.push('i');
    }
}

fn step4(w: &mut String) {
    let Some(suffix) = STEP4.iter().find(|suffix| w.ends_with(**suffix)) else {
        return;
    };
    let stem_len = w.len() - suffix.len();
    let stem = &w[..stem_len];
    if measure(stem) <= 1 {
        return;
    }
    if *suffix == "ion" && !(stem.ends_with('s') || stem.ends_with('t')) {
        return;
    }
    w.truncate(stem_len);
}

/// Final `e` and double `l`
fn step5(w: &mut String) {
    if w.ends_with('e') {
        let stem = &w[..w.len() - 1];
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            w.pop();
        }
    }
    if w.ends_with("ll") && measure(w) > 1 {
        w.pop();
    }
}

/// Replace the first listed suffix when the remaining stem has at least
/// `min_measure` vowel-consonant sequences.
fn replace_suffix(w: &mut String, rules: &[(&str, &str)], min_measure: usize) {
    let Some((suffix, replacement)) = rules.iter().find(|(suffix, _)| w.ends_with(*suffix))
    else {
        return;
    };
    let stem_len = w.len() - suffix.len();
    if measure(&w[..stem_len]) >= min_measure {
        w.truncate(stem_len);
        w.push_str(replacement);
    }
}

/// French: common nominal, adjectival and plural endings.
pub fn french(word: &str) -> String {
    const SUFFIXES: &[&str] = &[
        "issements", "issement", "atrices", "atrice", "ateurs", "ateur", "ations", "ation",
        "ements", "ement", "euses", "euse", "ments", "ment", "ités", "ité", "ives", "ive",
        "eaux", "aux", "ions", "eux", "es", "s", "e",
    ];
    strip_longest(word, SUFFIXES, 3)
}

/// German: derivational `-ung`/`-heit`/`-keit` and inflectional endings.
pub fn german(word: &str) -> String {
    const SUFFIXES: &[&str] = &[
        "ungen", "heiten", "keiten", "ung", "heit", "keit", "ern", "em", "en", "er", "es", "e",
        "s",
    ];
    strip_longest(word, SUFFIXES, 3)
}

/// Spanish: adverbial, nominal and plural endings.
pub fn spanish(word: &str) -> String {
    const SUFFIXES: &[&str] = &[
        "amientos", "amiento", "aciones", "ación", "acion", "idades", "idad", "mente", "ismos",
        "ismo", "istas", "ista", "es", "os", "as", "s", "o", "a",
    ];
    strip_longest(word, SUFFIXES, 3)
}

/// Remove the longest listed suffix that leaves at least `min_stem` chars.
fn strip_longest(word: &str, suffixes: &[&str], min_stem: usize) -> String {
    suffixes
        .iter()
        .filter_map(|suffix| word.strip_suffix(suffix))
        .filter(|stem| stem.chars().count() >= min_stem)
        .min_by_key(|stem| stem.len())
        .unwrap_or(word)
        .to_string()
}

/// `y` is a consonant at the start of a word or after a vowel.
fn is_consonant(w: &[u8], i: usize) -> bool {
    match w[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(w, i - 1),
        _ => true,
    }
}

/// Porter's m: the number of vowel-consonant sequences in `[C](VC){m}[V]`.
fn measure(s: &str) -> usize {
    let w = s.as_bytes();
    let mut i = 0;
    while i < w.len() && is_consonant(w, i) {
        i += 1;
    }
    let mut m = 0;
    loop {
        while i < w.len() && !is_consonant(w, i) {
            i += 1;
        }
        if i >= w.len() {
            return m;
        }
        while i < w.len() && is_consonant(w, i) {
            i += 1;
        }
        m += 1;
    }
}

fn has_vowel(s: &str) -> bool {
    let w = s.as_bytes();
    (0..w.len()).any(|i| !is_consonant(w, i))
}

fn ends_double_consonant(s: &str) -> bool {
    let w = s.as_bytes();
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

/// Consonant-vowel-consonant, the last not `w`, `x` or `y`.
fn ends_cvc(s: &str) -> bool {
    let w = s.as_bytes();
    let n = w.len();
    n >= 3
        && is_consonant(w, n - 3)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 1)
        && !matches!(w[n - 1], b'w' | b'x' | b'y')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_plurals() {
        assert_eq!(english("documents"), "document");
        assert_eq!(english("caresses"), "caress");
        assert_eq!(english("ponies"), "poni");
        assert_eq!(english("cats"), "cat");
    }

    #[test]
    fn test_english_es_plurals_match_singular() {
        assert_eq!(english("foxes"), english("fox"));
        assert_eq!(english("churches"), english("church"));
        assert_eq!(english("boxes"), english("box"));
        assert_eq!(english("statuses"), english("status"));
        assert_eq!(english("foxes"), "fox");
        assert_eq!(english("churches"), "church");
    }

    #[test]
    fn test_english_progressive() {
        assert_eq!(english("running"), "run");
        assert_eq!(english("testing"), "test");
        assert_eq!(english("tested"), "test");
        assert_eq!(english("filing"), "file");
        assert_eq!(english("falling"), "fall");
        assert_eq!(english("agreed"), "agre");
    }

    #[test]
    fn test_english_final_e() {
        assert_eq!(english("conflated"), english("conflate"));
        assert_eq!(english("troubled"), english("trouble"));
        assert_eq!(english("probate"), "probat");
        assert_eq!(english("rate"), "rate");
    }

    #[test]
    fn test_english_y() {
        assert_eq!(english("quickly"), "quickli");
        assert_eq!(english("happy"), "happi");
        assert_eq!(english("sky"), "sky");
    }

    #[test]
    fn test_english_derivational() {
        assert_eq!(english("relational"), "relat");
        assert_eq!(english("conditional"), "condit");
        assert_eq!(english("hopefulness"), "hope");
        assert_eq!(english("adjustment"), "adjust");
        assert_eq!(english("adoption"), "adopt");
        assert_eq!(english("controlling"), "control");
    }

    #[test]
    fn test_english_short_and_unicode_untouched() {
        assert_eq!(english("red"), "red");
        assert_eq!(english("is"), "is");
        assert_eq!(english("naïves"), "naïves");
    }

    #[test]
    fn test_english_variants_agree() {
        assert_eq!(english("treatments"), english("treatment"));
        assert_eq!(english("runs"), english("run"));
    }

    #[test]
    fn test_measure() {
        assert_eq!(measure("tr"), 0);
        assert_eq!(measure("tree"), 0);
        assert_eq!(measure("trouble"), 1);
        assert_eq!(measure("oats"), 1);
        assert_eq!(measure("troubles"), 2);
        assert_eq!(measure("private"), 2);
    }

    #[test]
    fn test_french() {
        assert_eq!(french("rapidement"), "rapid");
        assert_eq!(french("nations"), "nat");
        assert_eq!(french("chevaux"), "chev");
        assert_eq!(french("maisons"), "maison");
    }

    #[test]
    fn test_french_min_stem() {
        // stripping "ment" would leave an empty stem
        assert_eq!(french("ment"), "ment");
    }

    #[test]
    fn test_german() {
        assert_eq!(german("zeitungen"), "zeit");
        assert_eq!(german("freiheit"), "frei");
        assert_eq!(german("kindern"), "kind");
    }

    #[test]
    fn test_spanish() {
        assert_eq!(spanish("rapidamente"), "rapida");
        assert_eq!(spanish("ciudades"), "ciudad");
        assert_eq!(spanish("libros"), "libr");
    }
}
