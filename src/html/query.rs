use regex::Regex;
use scraper::ElementRef;
use std::fmt;

/// How an attribute value is matched
#[derive(Debug, Clone)]
pub enum AttrMatch {
    /// Exact value; for `class`, either one class or the whole class list
    Exact(String),
    /// Regular expression searched in the value
    Pattern(Regex),
}

impl AttrMatch {
    fn matches(&self, name: &str, value: &str) -> bool {
        match self {
            Self::Exact(expected) if name == "class" => {
                value.split_whitespace().any(|class| class == expected.as_str())
                    || value.split_whitespace().eq(expected.split_whitespace())
            }
            Self::Exact(expected) => value == expected.as_str(),
            Self::Pattern(re) => re.is_match(value),
        }
    }
}

/// A tag name with attribute filters, all of which must match
#[derive(Debug, Clone)]
pub struct TagQuery {
    name: String,
    attrs: Vec<(String, AttrMatch)>,
}

impl TagQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    /// Requires `name` to equal `value`
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs
            .push((name.into(), AttrMatch::Exact(value.into())));
        self
    }

    /// Requires `name` to match `pattern`
    pub fn attr_pattern(mut self, name: impl Into<String>, pattern: Regex) -> Self {
        self.attrs.push((name.into(), AttrMatch::Pattern(pattern)));
        self
    }

    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    /// Checks a single element against the query
    pub fn matches(&self, element: &ElementRef) -> bool {
        let el = element.value();
        if !el.name().eq_ignore_ascii_case(&self.name) {
            return false;
        }

        self.attrs.iter().all(|(name, expected)| {
            el.attr(name)
                .map(|value| expected.matches(name, value))
                .unwrap_or(false)
        })
    }
}

impl fmt::Display for TagQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (name, expected) in &self.attrs {
            match expected {
                AttrMatch::Exact(value) => write!(f, "[{}=\"{}\"]", name, value)?,
                AttrMatch::Pattern(re) => write!(f, "[{}~/{}/]", name, re.as_str())?,
            }
        }
        Ok(())
    }
}
