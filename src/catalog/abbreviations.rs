use regex::{NoExpand, Regex, RegexBuilder};
use tracing::warn;

/// Sales shorthand and the phrase it stands for.
///
/// A key may appear more than once; the first entry wins because later duplicates find
/// nothing left to replace.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("SMB", "Small Medium Business"),
    ("MM", "Mid Market"),
    ("ENT", "Enterprise"),
    ("TR", "TrustRadius"),
    ("SF", "Salesforce"),
    ("SFMC", "Salesforce Marketing Cloud"),
    ("HS", "HubSpot"),
    ("Sugar", "SugarCRM"),
    ("Social", "Advanced Social Media"),
    ("advanced social", "Advanced Social Media"),
    ("AP", "Automated Program"),
    ("UI", "User Interface"),
    ("UX", "User Experience"),
    ("MS", "Microsoft Dynamics"),
    ("Dyanmics", "Microsoft Dynamics"),
    ("365", "Microsoft Dynamics"),
    ("D365", "Microsoft Dynamics"),
    ("CTR", "click through rate"),
    ("CTO", "click to open"),
    ("ROI", "return on investment"),
    ("TCO", "total cost of ownership"),
    ("MAP", "marketing automation platform"),
    ("MAP", "marketing automation"),
    ("ESP", "email service provider"),
    ("AO", "Act-On"),
];

/// Widest word sequence considered by the repeated-sequence cleanup.
const MAX_REPEAT_WIDTH: usize = 6;

/// Upper bound on expansion passes while waiting for the text to settle.
const MAX_EXPANSION_PASSES: usize = 4;

struct ExpansionRule {
    pattern: Regex,
    expansion: &'static str,
    expansion_lower: String,
}

/// Whole-word, case-insensitive abbreviation expansion.
///
/// Rules run longest abbreviation first so "SFMC" is not shadowed by "SF". A rule is
/// skipped when its expansion is already present in the text, and the result is passed
/// through a cleanup that collapses immediately repeated word sequences. Passes repeat
/// until the text stops changing, so [`expand`](Self::expand) is idempotent.
pub struct AbbreviationExpander {
    rules: Vec<ExpansionRule>,
}

impl std::fmt::Debug for AbbreviationExpander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbbreviationExpander")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl Default for AbbreviationExpander {
    fn default() -> Self {
        Self::from_table(ABBREVIATIONS)
    }
}

impl AbbreviationExpander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: &[(&'static str, &'static str)]) -> Self {
        let mut entries = table.to_vec();
        // Stable: equal-length keys keep table order.
        entries.sort_by_key(|(abbr, _)| std::cmp::Reverse(abbr.chars().count()));

        let rules = entries
            .into_iter()
            .filter_map(|(abbr, expansion)| {
                let source = format!(r"\b{}\b", regex::escape(abbr));
                match RegexBuilder::new(&source).case_insensitive(true).build() {
                    Ok(pattern) => Some(ExpansionRule {
                        pattern,
                        expansion,
                        expansion_lower: expansion.to_lowercase(),
                    }),
                    Err(e) => {
                        warn!(abbreviation = abbr, error = %e, "Skipping unbuildable abbreviation rule");
                        None
                    }
                }
            })
            .collect();

        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn expand(&self, text: &str) -> String {
        let mut expanded = self.expand_once(text);
        for _ in 1..MAX_EXPANSION_PASSES {
            let next = self.expand_once(&expanded);
            if next == expanded {
                break;
            }
            expanded = next;
        }
        expanded
    }

    fn expand_once(&self, text: &str) -> String {
        let mut expanded = text.to_string();

        for rule in &self.rules {
            if normalized_lower(&expanded).contains(&rule.expansion_lower) {
                continue;
            }
            if rule.pattern.is_match(&expanded) {
                expanded = rule
                    .pattern
                    .replace_all(&expanded, NoExpand(rule.expansion))
                    .into_owned();
            }
        }

        collapse_repeated_words(&expanded)
    }
}

fn normalized_lower(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn same_word(a: &str, b: &str) -> bool {
    a.chars().any(char::is_alphanumeric) && a.to_lowercase() == b.to_lowercase()
}

/// Removes immediately repeated word sequences ("Social Media Social Media" → "Social Media").
///
/// Tokens must match exactly apart from case; "Mid, Mid" is not a repeat. Text without
/// repeats is returned untouched, whitespace included.
pub fn collapse_repeated_words(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    let mut changed = false;

    loop {
        let mut collapsed = false;
        let widest = MAX_REPEAT_WIDTH.min(tokens.len() / 2);

        'search: for width in (1..=widest).rev() {
            for start in 0..=(tokens.len() - 2 * width) {
                let repeated =
                    (0..width).all(|k| same_word(tokens[start + k], tokens[start + width + k]));

                if repeated {
                    tokens.drain(start + width..start + 2 * width);
                    collapsed = true;
                    changed = true;
                    break 'search;
                }
            }
        }

        if !collapsed {
            break;
        }
    }

    if changed {
        tokens.join(" ")
    } else {
        text.to_string()
    }
}
