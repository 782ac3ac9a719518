//! English inflection and case conversion for resource names.
//!
//! The rules follow the host framework's conventions closely enough that the
//! paths we plan are the paths its generators create (`Invoice` →
//! `create_invoices_table`, `Category` → `categories`).

use regex::Regex;
use std::sync::OnceLock;

const UNCOUNTABLE: &[&str] = &[
    "audio",
    "data",
    "equipment",
    "feedback",
    "fish",
    "information",
    "knowledge",
    "metadata",
    "money",
    "news",
    "police",
    "rice",
    "series",
    "sheep",
    "species",
    "traffic",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("criterion", "criteria"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("leaf", "leaves"),
    ("loaf", "loaves"),
    ("man", "men"),
    ("ox", "oxen"),
    ("person", "people"),
    ("thief", "thieves"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

/// Suffix rules in priority order; the first match wins.
const PLURAL_RULES: &[(&str, &str)] = &[
    (r"(?i)(s)tatus$", "${1}tatuses"),
    (r"(?i)(quiz)$", "${1}zes"),
    (r"(?i)([ml])ouse$", "${1}ice"),
    (r"(?i)(matr|vert|ind)(ix|ex)$", "${1}ices"),
    (r"(?i)^(ax|test)is$", "${1}es"),
    (r"(?i)(alias|census)$", "${1}es"),
    (r"(?i)(octop|vir|alumn|bacill|cact|foc|fung|nucle|radi|stimul|syllab|termin)us$", "${1}i"),
    (r"(?i)(bu)s$", "${1}ses"),
    (r"(?i)(x|ch|ss|sh)$", "${1}es"),
    (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
    (r"(?i)(hive|gulf)$", "${1}s"),
    (r"(?i)(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
    (r"(?i)sis$", "ses"),
    (r"(?i)([ti])a$", "${1}a"),
    (r"(?i)([ti])um$", "${1}a"),
    (r"(?i)(buffal|her|ech|tomat|potat|volcan)o$", "${1}oes"),
    (r"(?i)s$", "s"),
    (r"$", "s"),
];

fn plural_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        PLURAL_RULES
            .iter()
            .map(|(pattern, replacement)| {
                (Regex::new(pattern).expect("plural rule is valid"), *replacement)
            })
            .collect()
    })
}

/// Pluralize the last word of a (possibly PascalCase) identifier, the way
/// the host framework's inflector does (`Index` → `Indices`).
pub fn pluralize_word(word: &str) -> String {
    let (head, last) = split_last_word(word);
    if last.is_empty() {
        return word.to_string();
    }

    let lower = last.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return format!("{}{}", head, match_leading_case(last, plural));
    }

    let plural = plural_rules()
        .iter()
        .find(|(rule, _)| rule.is_match(last))
        .map(|(rule, replacement)| rule.replace(last, *replacement).into_owned())
        .unwrap_or_else(|| format!("{}s", last));

    format!("{}{}", head, plural)
}

/// `InvoiceItem` → `invoice_item`, `APIKey` → `a_p_i_key`.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.extend(c.to_lowercase());
    }
    result
}

/// `invoice_item`, `invoice-item` and `invoice item` all become `InvoiceItem`.
/// Letters after the first of each word keep their case.
pub fn to_studly_case(s: &str) -> String {
    s.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

fn split_last_word(word: &str) -> (&str, &str) {
    let boundary = word
        .char_indices()
        .skip(1)
        .filter(|(_, c)| c.is_uppercase())
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0);
    word.split_at(boundary)
}

fn match_leading_case(original: &str, replacement: &str) -> String {
    if original.chars().next().is_some_and(char::is_uppercase) {
        to_studly_case(replacement)
    } else {
        replacement.to_string()
    }
}
