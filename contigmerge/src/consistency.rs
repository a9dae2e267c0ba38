//! Pairwise path comparison and the link-to-fixed-point driver (spec
//! §4.4). `check_path_consistency` is a pure function — unlike the
//! original design this replaces (see `DESIGN.md`), it never mutates
//! its inputs; it returns the second path already reoriented to agree
//! with the first, leaving the caller to decide what to do with it.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::{
    path::{OrientedContig, Path, PathStore},
    registry::ContigKey,
};

/// The maximal common subpath found between two paths, and whether the
/// second path had to be reverse-complemented to align it (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub start_a: usize,
    pub end_a: usize,
    pub start_b: usize,
    pub end_b: usize,
    pub flipped: bool,
    pub duplicate_size: bool,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConsistencyError {
    #[error("winning alignment does not touch a path boundary at both ends")]
    NonTerminalAlignment,
    #[error("interior mismatch in alignment range [{start}, {end}]")]
    InteriorMismatch { start: usize, end: usize },
}

/// The outcome of a successful [`check_path_consistency`] call: the
/// alignment, plus `b` reoriented so its indices in the alignment line
/// up against `a`.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub alignment: Alignment,
    pub oriented_b: Path,
}

struct Seed {
    start_a: usize,
    end_a: usize,
    start_b: usize,
    end_b: usize,
    flipped: bool,
}

fn extend_seed(a: &[OrientedContig], b: &[OrientedContig], i: usize, j: usize) -> Option<Seed> {
    let (mut li, mut lj) = (i, j);
    while li > 0 && lj > 0 && a[li - 1] == b[lj - 1] {
        li -= 1;
        lj -= 1;
    }
    let (mut ri, mut rj) = (i, j);
    while ri + 1 < a.len() && rj + 1 < b.len() && a[ri + 1] == b[rj + 1] {
        ri += 1;
        rj += 1;
    }

    let left_terminal = li == 0 || lj == 0;
    let right_terminal = ri == a.len() - 1 || rj == b.len() - 1;
    if !left_terminal || !right_terminal {
        return None;
    }

    Some(Seed { start_a: li, end_a: ri, start_b: lj, end_b: rj, flipped: false })
}

/// Compares `a` against `b` (whose root key is `root_b`), looking for
/// the longest mutually terminal subpath they agree on (spec §4.4.1).
pub fn check_path_consistency(
    a: &Path,
    b: &Path,
    root_b: ContigKey,
) -> Result<Option<CheckResult>, ConsistencyError> {
    let anchors_a: Vec<usize> = a
        .as_slice()
        .iter()
        .enumerate()
        .filter(|(_, e)| e.id == root_b)
        .map(|(i, _)| i)
        .collect();
    let anchors_b: Vec<usize> = b
        .as_slice()
        .iter()
        .enumerate()
        .filter(|(_, e)| e.id == root_b)
        .map(|(j, _)| j)
        .collect();
    if anchors_a.is_empty() || anchors_b.is_empty() {
        return Ok(None);
    }

    let mut best: Option<(Seed, Path)> = None;
    let mut duplicate = false;

    for &i in &anchors_a {
        for &j in &anchors_b {
            let flip = a.as_slice()[i].reverse != b.as_slice()[j].reverse;
            let (candidate_b, cj) = if flip {
                (b.reverse_complement(), b.len() - 1 - j)
            } else {
                (b.clone(), j)
            };

            let Some(mut seed) = extend_seed(a.as_slice(), candidate_b.as_slice(), i, cj) else {
                continue;
            };
            seed.flipped = flip;
            let length = seed.end_a - seed.start_a + 1;

            match &best {
                None => best = Some((seed, candidate_b)),
                Some((current, _)) => {
                    let current_len = current.end_a - current.start_a + 1;
                    if length > current_len {
                        best = Some((seed, candidate_b));
                        duplicate = false;
                    } else if length == current_len {
                        duplicate = true;
                    }
                }
            }
        }
    }

    let Some((seed, oriented_b)) = best else {
        return Ok(None);
    };

    let length = seed.end_a - seed.start_a + 1;
    if duplicate && length < (a.len() - 1).min(b.len() - 1) {
        return Ok(None);
    }

    let left_terminal = seed.start_a == 0 || seed.start_b == 0;
    let right_terminal = seed.end_a == a.len() - 1 || seed.end_b == oriented_b.len() - 1;
    if !left_terminal || !right_terminal {
        return Err(ConsistencyError::NonTerminalAlignment);
    }

    for offset in 0..length {
        let ea = a.as_slice()[seed.start_a + offset];
        let eb = oriented_b.as_slice()[seed.start_b + offset];
        if ea.id != eb.id {
            return Err(ConsistencyError::InteriorMismatch {
                start: seed.start_a,
                end: seed.end_a,
            });
        }
    }

    Ok(Some(CheckResult {
        alignment: Alignment {
            start_a: seed.start_a,
            end_a: seed.end_a,
            start_b: seed.start_b,
            end_b: seed.end_b,
            flipped: seed.flipped,
            duplicate_size: duplicate,
        },
        oriented_b,
    }))
}

/// Phase 1 of `linkPaths` (spec §4.4.2): grows a fresh canonical path
/// per root by absorbing every transitively consistent neighbour.
fn phase1_grow(store: &PathStore) -> Result<PathStore, ConsistencyError> {
    let mut result = PathStore::new();

    for root in store.keys().collect::<Vec<_>>() {
        let mut canonical = store.get(root).unwrap().clone();
        let mut visited: HashSet<OrientedContig> = HashSet::new();
        let mut worklist: VecDeque<OrientedContig> = canonical.as_slice().iter().copied().collect();

        while let Some(item) = worklist.pop_front() {
            if !visited.insert(item) {
                continue;
            }
            if item.id == root {
                continue;
            }
            let Some(child) = store.get(item.id) else {
                continue;
            };

            if let Some(CheckResult { alignment, oriented_b }) =
                check_path_consistency(&canonical, child, item.id)?
            {
                let prefix = oriented_b.as_slice()[..alignment.start_b].to_vec();
                let suffix = oriented_b.as_slice()[alignment.end_b + 1..].to_vec();

                for &new_item in prefix.iter().chain(suffix.iter()) {
                    if !visited.contains(&new_item) {
                        worklist.push_back(new_item);
                    }
                }

                canonical.prepend(prefix);
                canonical.append(suffix);
            }
        }

        result.insert(root, canonical);
    }

    Ok(result)
}

fn key_set(path: &Path) -> BTreeSet<ContigKey> {
    path.as_slice().iter().map(|e| e.id).collect()
}

/// Phase 2 of `linkPaths` (spec §4.4.2): removes any path fully
/// contained in another, keeping exactly one representative of a
/// circular pair of mutually subsuming paths.
fn phase2_dedupe(mut store: PathStore) -> Result<(PathStore, Vec<String>), ConsistencyError> {
    let mut warnings = Vec::new();
    let mut removed: HashSet<ContigKey> = HashSet::new();

    for root in store.keys().collect::<Vec<_>>() {
        if removed.contains(&root) {
            continue;
        }
        let Some(canonical) = store.get(root).cloned() else {
            continue;
        };

        let mut neighbours: Vec<ContigKey> = canonical
            .as_slice()
            .iter()
            .map(|e| e.id)
            .filter(|&id| id != root)
            .collect();
        neighbours.sort();
        neighbours.dedup();

        for other in neighbours {
            if removed.contains(&other) || other == root {
                continue;
            }
            let Some(child) = store.get(other) else {
                continue;
            };

            let Some(CheckResult { alignment, oriented_b }) =
                check_path_consistency(&canonical, child, other)?
            else {
                continue;
            };

            let fully_contained = alignment.start_b == 0 && alignment.end_b == oriented_b.len() - 1;
            if !fully_contained {
                continue;
            }

            let canonical_keys = key_set(&canonical);
            let child_keys = key_set(child);

            if child_keys.is_subset(&canonical_keys) && !canonical_keys.is_subset(&child_keys) {
                store.erase(other);
                removed.insert(other);
            } else if canonical_keys.is_subset(&child_keys) && !child_keys.is_subset(&canonical_keys) {
                // The "canonical" side is actually the smaller one; the
                // roles were reversed by iteration order, so keep the
                // larger path and drop this one instead.
                store.erase(root);
                removed.insert(root);
                break;
            } else {
                warnings.push(format!(
                    "circular subsumption between paths rooted at {root} and {other}; keeping both"
                ));
            }
        }
    }

    Ok((store, warnings))
}

/// Post-processing (spec §4.4.3): dedupe the result store by path
/// *value* (not storage identity — several keys can alias the same
/// canonical path) and sort lexicographically for reproducible output.
fn canonicalize(store: &PathStore) -> Vec<Path> {
    let unique: BTreeSet<Path> = store.iter().map(|(_, p)| p.clone()).collect();
    unique.into_iter().collect()
}

/// Runs both phases to a fixed point and returns the deduped,
/// lexicographically sorted canonical paths plus any warnings raised
/// during Phase 2.
pub fn link_to_fixed_point(store: &PathStore) -> Result<(Vec<Path>, Vec<String>), ConsistencyError> {
    let grown = phase1_grow(store)?;
    let (deduped, warnings) = phase2_dedupe(grown)?;
    Ok((canonicalize(&deduped), warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ContigIdRegistry;

    fn build(records: &str) -> (ContigIdRegistry, PathStore) {
        let mut registry = ContigIdRegistry::new();
        let mut store = PathStore::new();
        crate::parser::parse_all(&mut registry, &mut store, records).unwrap();
        (registry, store)
    }

    fn names(registry: &ContigIdRegistry, path: &Path) -> Vec<String> {
        path.as_slice()
            .iter()
            .map(|e| format!("{}{}", registry.name(e.id).unwrap(), if e.reverse { '-' } else { '+' }))
            .collect()
    }

    #[test]
    fn s1_two_arm_merge() {
        let (registry, store) = build("@a+ -> b+ c+\n@c+ -> d+ e+\n");
        let (canonical, warnings) = link_to_fixed_point(&store).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(canonical.len(), 1);
        assert_eq!(names(&registry, &canonical[0]), vec!["a+", "b+", "c+", "d+", "e+"]);
    }

    #[test]
    fn s2_orientation_reconcile() {
        let (registry, store) = build("@a+ -> b+ c+\n@c- -> b- a-\n");
        let (canonical, _) = link_to_fixed_point(&store).unwrap();
        assert_eq!(canonical.len(), 1);
        assert_eq!(names(&registry, &canonical[0]), vec!["a+", "b+", "c+"]);
    }

    #[test]
    fn s3_ambiguous_overlap_is_rejected() {
        // A repeated "p q" run gives two equally plausible seed anchors
        // for B's root p; neither reaches a true path boundary (each is
        // cut off by the *other* copy's flanking material), so both are
        // discarded and the pair is inconsistent (spec §4.4.1 step 2c's
        // "terminal in at least one path" rule, not the duplicate-size
        // arithmetic — see DESIGN.md's note on the scenario's worked
        // example).
        let key = crate::registry::test_support::key;
        let (r, p, q, s) = (key(0), key(1), key(2), key(3));
        let a = Path::new(vec![
            OrientedContig { id: r, reverse: false },
            OrientedContig { id: p, reverse: false },
            OrientedContig { id: q, reverse: false },
            OrientedContig { id: p, reverse: false },
            OrientedContig { id: q, reverse: false },
            OrientedContig { id: s, reverse: false },
        ]);
        let t = key(4);
        let b = Path::new(vec![
            OrientedContig { id: p, reverse: false },
            OrientedContig { id: q, reverse: false },
            OrientedContig { id: t, reverse: false },
        ]);

        let result = check_path_consistency(&a, &b, p).unwrap();
        assert!(result.is_none(), "repeated anchors with disagreeing flanks must be rejected");
    }

    #[test]
    fn s4_circular_subsumption_keeps_exactly_one() {
        // Two roots whose stored paths already agree on the full merged
        // content (a realistic outcome of Phase 1 absorbing a shared
        // neighbourhood from both directions). Phase 2 finds each fully
        // contained in the other and, since neither key set is a strict
        // superset of the other, warns and keeps both entries rather
        // than guessing which to drop; the final value-based dedupe
        // (spec §4.4.3) is what actually collapses them to one, since
        // both entries hold an identical `Path`.
        let key = crate::registry::test_support::key;
        let (m, p, q, n) = (key(0), key(1), key(2), key(3));
        let shared = Path::new(vec![
            OrientedContig { id: m, reverse: false },
            OrientedContig { id: p, reverse: false },
            OrientedContig { id: q, reverse: false },
            OrientedContig { id: n, reverse: false },
        ]);
        let mut store = PathStore::new();
        store.insert(p, shared.clone());
        store.insert(q, shared);

        let (canonical, warnings) = link_to_fixed_point(&store).unwrap();
        assert_eq!(canonical.len(), 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn idempotent_linking() {
        let (_, store) = build("@a+ -> b+ c+\n@c+ -> d+ e+\n");
        let (first, _) = link_to_fixed_point(&store).unwrap();
        let (second, _) = link_to_fixed_point(&store).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unrelated_roots_without_shared_anchor_are_inconsistent() {
        let (_, store) = build("@a+ -> b+\n@c+ -> d+\n");
        let a = store.get(crate::registry::test_support::key(0)).unwrap();
        let c_key = crate::registry::test_support::key(2);
        let c = store.get(c_key).unwrap();
        assert!(check_path_consistency(a, c, c_key).unwrap().is_none());
    }
}
