/// The keyword vocabulary, used both to decide inclusion and to derive tags.
///
/// Matching is plain case-insensitive substring containment: "fairy" matches
/// "fairytale", "myth" matches "mythology".
#[derive(Debug, Clone)]
pub struct KeywordSet {
    /// (keyword as configured, lowercased form)
    terms: Vec<(String, String)>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<(String, String)> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if keyword.is_empty() {
                continue;
            }
            let lower = keyword.to_lowercase();
            if terms.iter().any(|(_, l)| *l == lower) {
                continue;
            }
            terms.push((keyword.to_string(), lower));
        }
        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// `text` must already be normalised (lowercased).
    pub fn matches(&self, text: &str) -> bool {
        !text.is_empty() && self.terms.iter().any(|(_, lower)| text.contains(lower.as_str()))
    }

    /// Keywords found in `text`, in vocabulary order.
    pub fn tags(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        self.terms
            .iter()
            .filter(|(_, lower)| text.contains(lower.as_str()))
            .map(|(keyword, _)| keyword.clone())
            .collect()
    }
}
