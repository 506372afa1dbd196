//! The label-grouped statement check engine.
//!
//! Method bodies may use a lightweight `label: text` convention to spell out
//! contract-style blocks:
//!
//! ```text
//! check: 'number is greater than 5'
//! number > 5
//!
//! then: 'print that number plus one'
//! println(number + 1)
//! ```
//!
//! [`add_checks_to`] groups a body's statements by label and rewrites every
//! `check`-labeled group head into a guarded assertion carrying the label's
//! descriptive text. Groups under any other label pass through unchanged.
//!
//! The grouping fold is public ([`group_by_label`], [`apply_by_label`]) so
//! transformations can install their own label conventions.
//!
//! Two grouping rules are easy to confuse and must not be:
//! - unlabeled statements *preceding the first label* are discarded during
//!   grouping (a documented limitation of the convention);
//! - a body with *no labels at all* produces no groups and is left completely
//!   untouched.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::tree::build::{expr, stmt};
use crate::tree::{MethodDecl, Statement};

/// The label tag rewritten into assertions.
pub const CHECK_LABEL: &str = "check";

/// A run of statements grouped under one label.
///
/// Lifetime-scoped to a single method body: built by [`group_by_label`],
/// consumed immediately, discarded once the body is replaced.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub label: Option<SmolStr>,
    pub text: Option<SmolStr>,
    pub statements: Vec<Statement>,
}

/// A per-statement rewrite applied to every statement of a matching group.
pub type StatementMapping = Box<dyn Fn(&Group, &Statement) -> Statement>;

/// Single left-to-right fold grouping a statement list by label.
///
/// A labeled statement closes the open group and opens a new one carrying its
/// tag and text; the statement itself becomes the new group's first member.
/// Unlabeled statements join the open group, or are discarded when no group is
/// open yet.
pub fn group_by_label(statements: Vec<Statement>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();

    for statement in statements {
        match statement.label() {
            Some(label) => {
                groups.push(Group {
                    label: Some(label.tag.clone()),
                    text: label.text.clone(),
                    statements: vec![statement],
                });
            }
            None => {
                if let Some(open) = groups.last_mut() {
                    open.statements.push(statement);
                }
                // no open group: the statement is dropped
            }
        }
    }

    groups
}

/// Apply per-label mappings to a group list. Groups whose label has no mapping
/// pass through unchanged; within a mapped group, the mapping sees every
/// statement in order.
pub fn apply_by_label(groups: Vec<Group>, mappings: &FxHashMap<SmolStr, StatementMapping>) -> Vec<Group> {
    groups
        .into_iter()
        .map(|group| {
            let mapping = group.label.as_ref().and_then(|l| mappings.get(l));
            match mapping {
                Some(mapping) => {
                    let statements = group.statements.iter().map(|s| mapping(&group, s)).collect();
                    Group { statements, ..group }
                }
                None => group,
            }
        })
        .collect()
}

/// [`apply_by_label`] followed by flattening the groups back into one statement
/// list, preserving group order.
pub fn apply_by_label_flatten(
    groups: Vec<Group>,
    mappings: &FxHashMap<SmolStr, StatementMapping>,
) -> Vec<Statement> {
    apply_by_label(groups, mappings)
        .into_iter()
        .flat_map(|g| g.statements)
        .collect()
}

/// Rewrite the `check` groups of a method body into guarded assertions.
///
/// The group-opening labeled statement becomes
/// `assert(booleanCoercionOf(expr), text)`; trailing unlabeled statements of
/// the group pass through verbatim, as do groups under any other label. A body
/// without a single labeled statement is left untouched.
pub fn add_checks_to(method: &mut MethodDecl) {
    if !method.body.iter().any(|s| s.label().is_some()) {
        return;
    }

    tracing::debug!(method = %method.name, "rewriting check blocks");

    let body = std::mem::take(&mut method.body);
    let groups = group_by_label(body);
    method.body = apply_by_label_flatten(groups, &check_mappings());
}

fn check_mappings() -> FxHashMap<SmolStr, StatementMapping> {
    let mut mappings: FxHashMap<SmolStr, StatementMapping> = FxHashMap::default();
    mappings.insert(SmolStr::new(CHECK_LABEL), Box::new(assertion_mapping));
    mappings
}

/// The labeled head of a check group becomes the assertion; everything else in
/// the group is ordinary code and passes through.
fn assertion_mapping(group: &Group, statement: &Statement) -> Statement {
    match statement {
        Statement::Expression { label: Some(_), expr: condition } => {
            stmt::assertion(expr::bool_coerce(condition.clone()), group.text.clone())
        }
        other => other.clone(),
    }
}
