//! Config keys at dotted paths.
//!
//! `app.providers` addresses the `"providers"` entry of the map passed to
//! `config.Add("app", ...)` inside `func init()`. Deeper paths descend
//! through nested `map[string]any` values.

use crate::action::{delete, hint, replace_child, Action, ActionError, Outcome, SkipReason};
use crate::ast::{build, equal, print, Field, Node, NodeKind, Step};
use crate::chain::Chain;
use crate::matcher::{any_node, func_decl, key_value, literal, quote};
use crate::modifiers::config_add;
use crate::modify::{Modifier, ModifyError};

/// Chain locating the entry at `segments` (at least one segment).
pub fn chain(segments: &[&str]) -> Chain {
    let mut chain = Chain::new(vec![func_decl("init")]);
    if let Some((first, rest)) = segments.split_first() {
        chain = chain.then(config_add(first));
        for segment in rest {
            chain = chain.then(key_value(literal(&quote(segment)), any_node()));
        }
    }
    chain
}

fn split(path: &str) -> Result<Vec<&str>, ModifyError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.trim().is_empty()) {
        return Err(ModifyError::InvalidKeyPath {
            path: path.to_string(),
            reason: "empty segment",
        });
    }
    if segments.len() < 2 {
        return Err(ModifyError::InvalidKeyPath {
            path: path.to_string(),
            reason: "expected <config>.<key>",
        });
    }
    Ok(segments)
}

/// Add `key: value` to the map at the parent of `path`. Skipped when the
/// key already exists.
pub fn add(path: &str, value: &str) -> Result<Modifier, ModifyError> {
    add_with_annotations(path, value, &[])
}

/// Like [`add`], with comment lines emitted above the new entry.
pub fn add_with_annotations(
    path: &str,
    value: &str,
    annotations: &[String],
) -> Result<Modifier, ModifyError> {
    let segments = split(path)?;
    let (key, parent) = segments
        .split_last()
        .ok_or_else(|| ModifyError::InvalidKeyPath {
            path: path.to_string(),
            reason: "empty path",
        })?;
    let mut entry = build::key_value(build::string_lit(key), build::expr(value)?);
    entry.deco.comments = annotations.to_vec();
    Ok(Modifier::new(
        format!("add config {path}"),
        chain(parent),
        Box::new(AddEntry { entry }),
    ))
}

pub fn remove(path: &str) -> Result<Modifier, ModifyError> {
    let segments = split(path)?;
    Ok(Modifier::new(
        format!("remove config {path}"),
        chain(&segments),
        delete(),
    ))
}

/// Overwrite the value at `path`. Skipped when it is already equal.
pub fn replace(path: &str, value: &str) -> Result<Modifier, ModifyError> {
    let segments = split(path)?;
    Ok(Modifier::new(
        format!("replace config {path}"),
        chain(&segments),
        replace_child(Field::Value, build::expr(value)?),
    ))
}

/// Appends a key-value entry to the map literal held by the target: the
/// second argument of a `config.Add` call, or the value of an entry.
#[derive(Debug)]
struct AddEntry {
    entry: Node,
}

impl Action for AddEntry {
    fn apply(&self, root: &mut Node, target: &[Step]) -> Result<Outcome, ActionError> {
        let holder = root.at_mut(target).ok_or(ActionError::TargetMissing)?;
        let map = match &mut holder.kind {
            NodeKind::Call { args, .. } => args.items.get_mut(1),
            NodeKind::KeyValue { value, .. } => Some(value.as_mut()),
            _ => None,
        }
        .ok_or(ActionError::TargetMissing)?;
        let found = map.kind_name().to_string();
        let NodeKind::Composite { elems, .. } = &mut map.kind else {
            return Err(ActionError::UnexpectedKind {
                expected: "composite literal",
                found,
            });
        };

        let key = self.entry.child(Field::Key);
        let exists = elems.items.iter().any(|item| match &item.kind {
            NodeKind::KeyValue { key: existing, .. } => key.is_some_and(|key| equal(existing, key)),
            _ => false,
        });
        if exists {
            return Ok(Outcome::Skipped(SkipReason::Duplicate {
                entry: key.map(print).unwrap_or_default(),
            }));
        }
        let mut entry = self.entry.clone();
        hint(&mut entry);
        elems.items.push(entry);
        Ok(Outcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainMatchError;
    use crate::go::parse_source;

    const APP: &str = r#"package config

import (
	"github.com/goravel/framework/facades"
)

func init() {
	config := facades.Config()
	config.Add("app", map[string]any{
		// Application Name
		"name":  config.Env("APP_NAME", "Goravel"),
		"exist": true,
		"providers": []foundation.ServiceProvider{
			&auth.ServiceProvider{},
		},
		"debug": config.Env("APP_DEBUG", false),
	})
}
"#;

    fn run(modifier: &Modifier, src: &str) -> (Outcome, String) {
        let mut root = parse_source(src).unwrap();
        let outcome = modifier.apply(&mut root).unwrap();
        (outcome, print(&root))
    }

    #[test]
    fn adds_key_at_end_of_map() {
        let (outcome, out) = run(&add("app.timezone", "\"UTC\"").unwrap(), APP);
        assert_eq!(outcome, Outcome::Applied);
        assert!(out.contains(
            "\t\t\"debug\": config.Env(\"APP_DEBUG\", false),\n\t\t\"timezone\": \"UTC\",\n\t})"
        ));
    }

    #[test]
    fn first_key_in_empty_map_gets_its_own_line() {
        let src = "package config\n\nfunc init() {\n\tconfig.Add(\"cache\", map[string]any{})\n}\n";
        let (outcome, out) = run(&add("cache.driver", "\"redis\"").unwrap(), src);
        assert_eq!(outcome, Outcome::Applied);
        assert!(out.contains("map[string]any{\n\t\t\"driver\": \"redis\",\n\t})"));
    }

    #[test]
    fn add_is_idempotent() {
        let modifier = add("app.timezone", "\"UTC\"").unwrap();
        let (_, once) = run(&modifier, APP);
        let (outcome, twice) = run(&modifier, &once);
        assert_eq!(
            outcome,
            Outcome::Skipped(SkipReason::Duplicate {
                entry: "\"timezone\"".to_string()
            })
        );
        assert_eq!(once, twice);
    }

    #[test]
    fn add_skips_existing_key() {
        let (outcome, out) = run(&add("app.name", "\"other\"").unwrap(), APP);
        assert!(!outcome.is_applied());
        assert_eq!(out, APP);
    }

    #[test]
    fn annotations_become_comments() {
        let modifier =
            add_with_annotations("app.locale", "\"en\"", &["Default locale".to_string()]).unwrap();
        let (_, out) = run(&modifier, APP);
        assert!(out.contains("\t\t// Default locale\n\t\t\"locale\": \"en\",\n"));
    }

    #[test]
    fn removes_only_the_target_entry() {
        let (outcome, out) = run(&remove("app.providers").unwrap(), APP);
        assert_eq!(outcome, Outcome::Applied);
        let expected = APP.replace(
            "\t\t\"providers\": []foundation.ServiceProvider{\n\t\t\t&auth.ServiceProvider{},\n\t\t},\n",
            "",
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn replaces_value_in_place() {
        let (outcome, out) = run(&replace("app.exist", "false").unwrap(), APP);
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(out, APP.replace("\"exist\": true", "\"exist\": false"));

        let (outcome, _) = run(&replace("app.exist", "true").unwrap(), APP);
        assert_eq!(outcome, Outcome::Skipped(SkipReason::Unchanged));
    }

    #[test]
    fn nested_paths_descend_into_maps() {
        let src = "package config\n\nfunc init() {\n\tconfig.Add(\"database\", map[string]any{\n\t\t\"connections\": map[string]any{\n\t\t\t\"mysql\": map[string]any{},\n\t\t},\n\t})\n}\n";
        let (_, out) = run(&add("database.connections.postgres", "map[string]any{}").unwrap(), src);
        assert!(out.contains("\t\t\t\"mysql\": map[string]any{},\n\t\t\t\"postgres\": map[string]any{},\n\t\t},"));
    }

    #[test]
    fn missing_config_reports_chain_position() {
        let mut root = parse_source(APP).unwrap();
        let err = remove("database.default").unwrap().apply(&mut root).unwrap_err();
        assert!(matches!(
            err,
            ModifyError::ChainMatch(ChainMatchError { remaining: 2, total: 3 })
        ));
    }

    #[test]
    fn rejects_bad_paths() {
        assert!(matches!(add("app", "1"), Err(ModifyError::InvalidKeyPath { .. })));
        assert!(matches!(remove("app..x"), Err(ModifyError::InvalidKeyPath { .. })));
        assert!(matches!(add("app.x", "&{"), Err(ModifyError::Snippet(_))));
    }
}
