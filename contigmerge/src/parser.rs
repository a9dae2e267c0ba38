//! Parses path records of the form
//! `@ <root_name><sign> -> <elem1><sign1> <elem2><sign2> ...` (spec §6).

use crate::{
    path::{OrientedContig, Path, PathStore},
    registry::{ContigIdRegistry, RegistryError},
};

#[derive(Debug, Clone, thiserror::Error)]
pub enum PathParseError {
    #[error("line {line}: record does not start with '@': {text:?}")]
    MissingAtSign { line: usize, text: String },
    #[error("line {line}: missing root contig")]
    MissingRoot { line: usize },
    #[error("line {line}: contig name {name:?} is missing a +/- orientation sign")]
    MissingSign { line: usize, name: String },
    #[error("line {line}: expected '->', got {text:?}")]
    MissingArrow { line: usize, text: String },
    #[error("line {line}: path has no elements after '->'")]
    EmptyTail { line: usize },
    #[error("line {line}: stored path for root {root:?} does not start with the unreversed root")]
    RootMismatch { line: usize, root: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn split_sign(token: &str) -> Option<(&str, bool)> {
    let mut chars = token.chars();
    let sign = chars.next_back()?;
    let name = chars.as_str();
    if name.is_empty() {
        return None;
    }
    match sign {
        '+' => Some((name, false)),
        '-' => Some((name, true)),
        _ => None,
    }
}

/// Parses and folds one path record into `store`, interning any new
/// contig names through `registry`. See spec §4.2 for the fold rules.
pub fn parse_line(
    registry: &mut ContigIdRegistry,
    store: &mut PathStore,
    line: &str,
    line_no: usize,
) -> Result<(), PathParseError> {
    let line = line.trim_end_matches(['\n', '\r']);
    let rest = line
        .trim_start()
        .strip_prefix('@')
        .ok_or_else(|| PathParseError::MissingAtSign { line: line_no, text: line.to_owned() })?;

    let mut tokens = rest.split_whitespace();

    let root_tok = tokens.next().ok_or(PathParseError::MissingRoot { line: line_no })?;
    let (root_name, root_reverse) = split_sign(root_tok)
        .ok_or_else(|| PathParseError::MissingSign { line: line_no, name: root_tok.to_owned() })?;

    let arrow = tokens.next().unwrap_or("");
    if arrow != "->" {
        return Err(PathParseError::MissingArrow { line: line_no, text: arrow.to_owned() });
    }

    let mut tail = Vec::new();
    for tok in tokens {
        let (name, reverse) = split_sign(tok)
            .ok_or_else(|| PathParseError::MissingSign { line: line_no, name: tok.to_owned() })?;
        let id = registry.intern(name)?;
        tail.push(OrientedContig { id, reverse });
    }
    if tail.is_empty() {
        return Err(PathParseError::EmptyTail { line: line_no });
    }

    let root_key = registry.intern(root_name)?;
    let unreversed_root = OrientedContig { id: root_key, reverse: false };

    // Locate or create the entry, always starting from the bare root
    // (spec §4.2 step 3), then fold the tail in (step 4/5). Doing this
    // uniformly, rather than special-casing a fresh entry, keeps a
    // reversed root from ever landing at position 0.
    if store.get(root_key).is_none() {
        store.insert(root_key, Path::new(vec![unreversed_root]));
    }
    let existing = store.get_mut(root_key).expect("just inserted");
    if existing.as_slice()[0] != unreversed_root {
        return Err(PathParseError::RootMismatch { line: line_no, root: root_name.to_owned() });
    }
    if root_reverse {
        // The tail was written trailing a reversed root, i.e. read along
        // the opposite strand. Reverse-complementing it (order *and*
        // orientation bits, same as `Path::reverse_complement`) brings
        // it back into the forward convention the rest of the store
        // uses before prepending it ahead of the root.
        tail.reverse();
        for elem in &mut tail {
            elem.reverse = !elem.reverse;
        }
        existing.prepend(tail);
    } else {
        existing.append(tail);
    }

    Ok(())
}

/// Parses every line of `text`, one record per line.
pub fn parse_all(
    registry: &mut ContigIdRegistry,
    store: &mut PathStore,
    text: &str,
) -> Result<(), PathParseError> {
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        parse_line(registry, store, line, i + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_root_appends_tail() {
        let mut registry = ContigIdRegistry::new();
        let mut store = PathStore::new();
        parse_all(&mut registry, &mut store, "@a+ -> b+ c+\n").unwrap();

        let a = registry.intern("a").unwrap();
        let path = store.get(a).unwrap();
        let names: Vec<String> = path
            .as_slice()
            .iter()
            .map(|e| format!("{}{}", registry.name(e.id).unwrap(), if e.reverse { '-' } else { '+' }))
            .collect();
        assert_eq!(names, vec!["a+", "b+", "c+"]);
    }

    #[test]
    fn reversed_root_prepends_reverse_complemented_tail() {
        let mut registry = ContigIdRegistry::new();
        let mut store = PathStore::new();
        // "c- -> b- a-" reads the reverse strand from c; folded back to
        // the forward convention that's "a+ b+" ahead of the root.
        parse_all(&mut registry, &mut store, "@c- -> b- a-\n").unwrap();

        let c = registry.intern("c").unwrap();
        let path = store.get(c).unwrap();
        let names: Vec<String> = path
            .as_slice()
            .iter()
            .map(|e| format!("{}{}", registry.name(e.id).unwrap(), if e.reverse { '-' } else { '+' }))
            .collect();
        assert_eq!(names, vec!["a+", "b+", "c+"]);
    }

    #[test]
    fn root_fixpoint_property() {
        let mut registry = ContigIdRegistry::new();
        let mut store = PathStore::new();
        parse_all(
            &mut registry,
            &mut store,
            "@a+ -> b+ c+\n@c+ -> b+ c+ d+ e+\n",
        )
        .unwrap();

        for key in store.keys() {
            let path = store.get(key).unwrap();
            assert_eq!(path.as_slice()[0], OrientedContig { id: key, reverse: false });
        }
    }

    #[test]
    fn root_mismatch_is_rejected() {
        let mut registry = ContigIdRegistry::new();
        let mut store = PathStore::new();
        parse_all(&mut registry, &mut store, "@a+ -> b+\n").unwrap();

        // Corrupt the stored path so its first element isn't the unreversed root.
        let a = registry.intern("a").unwrap();
        let b = registry.intern("b").unwrap();
        store.insert(a, Path::new(vec![OrientedContig { id: b, reverse: false }]));

        let err = parse_line(&mut registry, &mut store, "@a+ -> c+", 2).unwrap_err();
        assert!(matches!(err, PathParseError::RootMismatch { .. }));
    }

    #[test]
    fn malformed_lines_are_rejected() {
        let mut registry = ContigIdRegistry::new();
        let mut store = PathStore::new();
        assert!(matches!(
            parse_line(&mut registry, &mut store, "a+ -> b+", 1),
            Err(PathParseError::MissingAtSign { .. })
        ));
        assert!(matches!(
            parse_line(&mut registry, &mut store, "@a -> b+", 1),
            Err(PathParseError::MissingSign { .. })
        ));
        assert!(matches!(
            parse_line(&mut registry, &mut store, "@a+ => b+", 1),
            Err(PathParseError::MissingArrow { .. })
        ));
        assert!(matches!(
            parse_line(&mut registry, &mut store, "@a+ ->", 1),
            Err(PathParseError::EmptyTail { .. })
        ));
    }
}
