//! Resource specifier splitting.
//!
//! A specifier such as `app.widget*color` alternates components with
//! binding runs. A run made only of `.` is a tight binding; a run that
//! contains any `*` is a loose binding.

/// How a component is attached to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Binding {
    /// `.`: the component must follow immediately.
    Tight,
    /// `*`: any number of components may come in between.
    Loose,
}

impl Binding {
    /// Separator used when writing a specifier back out.
    pub fn as_char(self) -> char {
        match self {
            Binding::Tight => '.',
            Binding::Loose => '*',
        }
    }
}

/// Errors from splitting a resource specifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecifierError {
    #[error("resource specifier has an empty final component: {0:?}")]
    EmptyTail(String),
}

fn is_binding(c: char) -> bool {
    c == '.' || c == '*'
}

/// Split a specifier into `(binding, component)` pairs.
///
/// The binding of the first component is always [`Binding::Tight`]. A
/// specifier starting with `*` yields an empty first component followed by
/// a loose one, e.g. `*foo` becomes `[(Tight, ""), (Loose, "foo")]`.
pub fn split_specifier(spec: &str) -> Result<Vec<(Binding, &str)>, SpecifierError> {
    let mut parts = Vec::new();
    let mut binding = Binding::Tight;
    let mut rest = spec;

    loop {
        let end = rest.find(is_binding).unwrap_or(rest.len());
        parts.push((binding, &rest[..end]));
        rest = &rest[end..];

        if rest.is_empty() {
            break;
        }

        let run_end = rest.find(|c| !is_binding(c)).unwrap_or(rest.len());
        binding = if rest[..run_end].contains('*') {
            Binding::Loose
        } else {
            Binding::Tight
        };
        rest = &rest[run_end..];

        if rest.is_empty() {
            parts.push((binding, rest));
            break;
        }
    }

    match parts.last() {
        Some((_, last)) if !last.is_empty() => Ok(parts),
        _ => Err(SpecifierError::EmptyTail(spec.to_string())),
    }
}

/// Split a lookup name or class on `.`. No wildcard handling.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

/// Write `(binding, component)` pairs back out as a specifier string.
pub fn join_specifier<S: AsRef<str>>(parts: &[(Binding, S)]) -> String {
    let mut out = String::new();
    for (i, (binding, component)) in parts.iter().enumerate() {
        if i > 0 {
            out.push(binding.as_char());
        }
        out.push_str(component.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tight_only() {
        let parts = split_specifier("a.b.c").unwrap();
        assert_eq!(
            parts,
            vec![(Binding::Tight, "a"), (Binding::Tight, "b"), (Binding::Tight, "c")]
        );
    }

    #[test]
    fn test_split_mixed_bindings() {
        let parts = split_specifier("foo.bar*gazonk").unwrap();
        assert_eq!(
            parts,
            vec![
                (Binding::Tight, "foo"),
                (Binding::Tight, "bar"),
                (Binding::Loose, "gazonk")
            ]
        );
    }

    #[test]
    fn test_binding_runs_collapse() {
        // A run containing any star is loose
        let parts = split_specifier("a.*.b..c").unwrap();
        assert_eq!(
            parts,
            vec![(Binding::Tight, "a"), (Binding::Loose, "b"), (Binding::Tight, "c")]
        );
    }

    #[test]
    fn test_leading_star() {
        let parts = split_specifier("*background").unwrap();
        assert_eq!(parts, vec![(Binding::Tight, ""), (Binding::Loose, "background")]);
    }

    #[test]
    fn test_single_component() {
        assert_eq!(split_specifier("title").unwrap(), vec![(Binding::Tight, "title")]);
    }

    #[test]
    fn test_trailing_binding_rejected() {
        assert_eq!(
            split_specifier("foo."),
            Err(SpecifierError::EmptyTail("foo.".to_string()))
        );
        assert!(split_specifier("foo*").is_err());
        assert!(split_specifier("").is_err());
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("xterm.vt100.background"), vec!["xterm", "vt100", "background"]);
        assert_eq!(split_path("a*b"), vec!["a*b"]);
    }

    #[test]
    fn test_join_inverts_split() {
        for spec in ["a.b.c", "*foo", "foo.bar*gazonk", "?.x"] {
            let parts = split_specifier(spec).unwrap();
            assert_eq!(join_specifier(&parts), spec);
        }
    }
}
