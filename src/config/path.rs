use std::fmt;

/// Dot-separated location inside a configuration tree.
///
/// Segments are kept separately so writes never have to re-split a key that
/// itself contains a dot.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse "reply.public_probs.friend" into its segments.
    pub fn parse(s: &str) -> Self {
        Self(
            s.split('.')
                .filter(|seg| !seg.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segs = self.0.clone();
        segs.push(name.to_string());
        Self(segs)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_and_display() {
        let p = FieldPath::parse("reply.public_probs.friend");
        assert_eq!(p.segments(), ["reply", "public_probs", "friend"]);
        assert_eq!(p.to_string(), "reply.public_probs.friend");
        assert_eq!(p.last(), Some("friend"));
    }

    #[test]
    fn child_extends_without_mutating() {
        let parent = FieldPath::parse("reply");
        let kid = parent.child("max_reply_chars");
        assert_eq!(parent.to_string(), "reply");
        assert_eq!(kid.to_string(), "reply.max_reply_chars");
        assert!(FieldPath::parse("").is_root());
    }
}
