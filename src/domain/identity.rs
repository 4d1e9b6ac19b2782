/// Replacement for characters the transliteration table does not know.
const PLACEHOLDER: char = '_';

/// Accented letters that get folded to a plain ASCII letter when deriving
/// nicknames. ASCII letters pass through untouched.
const TRANSLITERATIONS: &[(char, char)] = &[
    ('ø', 'o'),
    ('ö', 'o'),
    ('Р', 'r'),
    ('ð', 'r'),
    ('ä', 'a'),
    ('Á', 'a'),
    ('á', 'a'),
    ('é', 'e'),
];

/// How many dots an `@`-less address needs before the first one is taken
/// to be an obfuscated `@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotRule {
    AtLeastOne,
    MoreThanOne,
}

impl DotRule {
    fn applies(self, dots: usize) -> bool {
        match self {
            DotRule::AtLeastOne => dots >= 1,
            DotRule::MoreThanOne => dots > 1,
        }
    }
}

pub fn normalize_email(raw: &str, rule: DotRule) -> String {
    let email = raw.trim();
    if email.contains('@') || !rule.applies(email.matches('.').count()) {
        return email.to_string();
    }
    email.replacen('.', "@", 1)
}

pub fn format_identity(name: &str, email: &str) -> String {
    format!("{name} <{email}>")
}

pub fn transliterate(letter: char) -> char {
    if letter.is_ascii_alphabetic() {
        return letter;
    }
    TRANSLITERATIONS
        .iter()
        .find(|(from, _)| *from == letter)
        .map(|(_, to)| *to)
        .unwrap_or(PLACEHOLDER)
}

/// Guess the short handle someone would pick from their display name:
/// first initial followed by the last name, folded to lower-case ASCII.
pub fn derive_nickname(name: &str) -> String {
    if !name.contains(' ') {
        return name.to_string();
    }
    let Some((first, last)) = name_parts(name) else {
        return name.to_string();
    };
    let initial = first.chars().next().map(String::from).unwrap_or_default();

    format!("{initial}{last}")
        .chars()
        .map(transliterate)
        .filter(|letter| *letter != PLACEHOLDER)
        .collect::<String>()
        .to_lowercase()
}

/// First and last name. A parenthesized part is a romanized alias and wins
/// over the surrounding text.
fn name_parts(name: &str) -> Option<(&str, &str)> {
    let parenthesized = match (name.find('('), name.rfind(')')) {
        (Some(open), Some(close)) if open < close => Some((open, close)),
        _ => None,
    };

    match parenthesized {
        Some((open, close)) => {
            let inner: Vec<&str> = name[open + 1..close].split_whitespace().collect();
            let first = *inner.first()?;
            let last = if inner.len() > 1 {
                inner[inner.len() - 1]
            } else {
                name[close + 1..]
                    .split_whitespace()
                    .last()
                    .or_else(|| name[..open].split_whitespace().last())
                    .unwrap_or(first)
            };
            Some((first, last))
        }
        None => {
            let words: Vec<&str> = name.split_whitespace().collect();
            Some((*words.first()?, *words.last()?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_obfuscated_addresses() {
        assert_eq!(normalize_email("a.b.c", DotRule::MoreThanOne), "a@b.c");
        assert_eq!(normalize_email("a.b", DotRule::MoreThanOne), "a.b");
        assert_eq!(normalize_email("ab", DotRule::MoreThanOne), "ab");
        assert_eq!(normalize_email("a.b", DotRule::AtLeastOne), "a@b");
        assert_eq!(normalize_email("ab", DotRule::AtLeastOne), "ab");
    }

    #[test]
    fn leaves_real_addresses_alone() {
        assert_eq!(
            normalize_email(" jane.doe@example.org ", DotRule::AtLeastOne),
            "jane.doe@example.org"
        );
    }

    #[test]
    fn formats_name_and_email() {
        assert_eq!(
            format_identity("Jane Doe", "jane@example.org"),
            "Jane Doe <jane@example.org>"
        );
    }

    #[test]
    fn derives_initial_plus_last_name() {
        assert_eq!(derive_nickname("Jane Doe"), "jdoe");
        assert_eq!(derive_nickname("Jane Mary Doe"), "jdoe");
    }

    #[test]
    fn prefers_parenthesized_alias() {
        assert_eq!(derive_nickname("Jane (Janey) Doe"), "jdoe");
        assert_eq!(derive_nickname("Сергей (Sergej Pupykin)"), "spupykin");
    }

    #[test]
    fn single_word_name_is_its_own_nickname() {
        assert_eq!(derive_nickname("Foutrelis"), "Foutrelis");
    }

    #[test]
    fn folds_accented_letters() {
        assert_eq!(transliterate('ø'), 'o');
        assert_eq!(transliterate('Р'), 'r');
        assert_eq!(transliterate('Á'), 'a');
        assert_eq!(transliterate('-'), '_');
        assert_eq!(derive_nickname("Tom Rødseth"), "trodseth");
        assert_eq!(derive_nickname("Ann Mül-ler"), "amller");
    }
}
