//! AST normalization.
//!
//! Turns one module's raw tree into a canonical `ModuleBlock`: the module
//! header gives the identifier, a first pass over top-level statements builds
//! the alias table, then every function clause has its calls extracted by a
//! fixed, ordered classification over the closed `RawNode` set.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::block::{Attribute, Call, FunctionBlock, ModuleBlock, ModuleName};
use crate::domain::raw::RawNode;

/// Raw tree did not normalize. One bad module never aborts a batch scan;
/// callers log and skip.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("expected a module declaration at the root, found {found}")]
    NotAModule { found: &'static str },
    #[error("module declaration carries an empty name")]
    UnnamedModule,
}

/// Short name -> fully-qualified module, valid for one module body only.
type AliasTable = HashMap<String, ModuleName>;

pub struct AstNormalizer;

impl AstNormalizer {
    /// Normalize one module's raw tree into a `ModuleBlock`.
    pub fn normalize(root: &RawNode) -> Result<ModuleBlock, NormalizeError> {
        let (name, body) = match root {
            RawNode::Module { name, body } => (name, body),
            other => {
                return Err(NormalizeError::NotAModule {
                    found: other.kind_name(),
                })
            }
        };

        let module = ModuleName::parse(name);
        if module.is_empty() {
            return Err(NormalizeError::UnnamedModule);
        }

        let aliases = build_alias_table(body);

        let mut functions = Vec::new();
        let mut attributes = Vec::new();
        for statement in body {
            match statement {
                // Each clause stays its own entry; same-name clauses are
                // never merged and declaration order is preserved.
                RawNode::Function { name, params, body } => {
                    let mut calls = Vec::new();
                    for expr in body {
                        extract_calls(expr, &aliases, &mut calls);
                    }
                    functions.push(FunctionBlock {
                        name: name.clone(),
                        arity: Some(params.len()),
                        params: Some(params.clone()),
                        calls,
                    });
                }
                RawNode::Attribute { key, value } => attributes.push(Attribute {
                    key: key.clone(),
                    value: value.clone(),
                }),
                // Aliases were consumed by the first pass; anything else at
                // the top level is not a declaration we track.
                _ => {}
            }
        }

        Ok(ModuleBlock {
            name: module,
            functions,
            attributes,
        })
    }
}

/// First pass: collect alias declarations from the module body.
/// Later declarations shadow earlier ones for the same short name.
fn build_alias_table(body: &[RawNode]) -> AliasTable {
    let mut table = AliasTable::new();
    for statement in body {
        match statement {
            RawNode::Alias { target, rename } => {
                let full = ModuleName::parse(target);
                let short = rename
                    .clone()
                    .or_else(|| full.last_segment().map(str::to_string));
                if let Some(short) = short {
                    table.insert(short, full);
                }
            }
            RawNode::AliasGroup { prefix, suffixes } => {
                let prefix = ModuleName::parse(prefix);
                for suffix in suffixes {
                    let full = prefix.join(&ModuleName::parse(suffix));
                    if let Some(short) = full.last_segment() {
                        table.insert(short.to_string(), full.clone());
                    }
                }
            }
            _ => {}
        }
    }
    table
}

/// Resolve a call target through the alias table. Only bare single-segment
/// names are alias candidates; everything else passes through unchanged.
fn resolve_target(module: &str, aliases: &AliasTable) -> ModuleName {
    let name = ModuleName::parse(module);
    if name.is_bare() {
        if let Some(full) = name.last_segment().and_then(|s| aliases.get(s)) {
            return full.clone();
        }
    }
    name
}

/// Ordered first-match call extraction over one expression.
///
/// Every rule appends the call it directly produced first, then the calls
/// found inside its sub-expressions, so the output preserves call-site order.
fn extract_calls(node: &RawNode, aliases: &AliasTable, out: &mut Vec<Call>) {
    match node {
        RawNode::QualifiedCall {
            module,
            name,
            args,
            position,
        } => {
            out.push(Call {
                module: Some(resolve_target(module, aliases)),
                name: name.clone(),
                arity: args.len(),
                position: *position,
            });
            for arg in args {
                extract_calls(arg, aliases, out);
            }
        }
        // lhs first so pipelines read left to right; the piped value counts
        // as the rhs call's first argument.
        RawNode::Pipe { lhs, rhs } => {
            extract_calls(lhs, aliases, out);
            match rhs.as_ref() {
                RawNode::QualifiedCall {
                    module,
                    name,
                    args,
                    position,
                } => {
                    out.push(Call {
                        module: Some(resolve_target(module, aliases)),
                        name: name.clone(),
                        arity: args.len() + 1,
                        position: *position,
                    });
                    for arg in args {
                        extract_calls(arg, aliases, out);
                    }
                }
                RawNode::Call {
                    name,
                    args,
                    position,
                } => {
                    out.push(Call {
                        module: None,
                        name: name.clone(),
                        arity: args.len() + 1,
                        position: *position,
                    });
                    for arg in args {
                        extract_calls(arg, aliases, out);
                    }
                }
                RawNode::Var { name } => {
                    out.push(Call {
                        module: None,
                        name: name.clone(),
                        arity: 1,
                        position: None,
                    });
                }
                other => extract_calls(other, aliases, out),
            }
        }
        RawNode::With {
            clauses,
            body,
            else_body,
        } => {
            for clause in clauses {
                extract_calls(&clause.expr, aliases, out);
            }
            for expr in body {
                extract_calls(expr, aliases, out);
            }
            if let Some(else_body) = else_body {
                for expr in else_body {
                    extract_calls(expr, aliases, out);
                }
            }
        }
        RawNode::Tuple { items } | RawNode::List { items } => {
            for item in items {
                extract_calls(item, aliases, out);
            }
        }
        RawNode::Block { body } => {
            for statement in body {
                extract_calls(statement, aliases, out);
            }
        }
        RawNode::Call {
            name,
            args,
            position,
        } => {
            out.push(Call {
                module: None,
                name: name.clone(),
                arity: args.len(),
                position: *position,
            });
            for arg in args {
                extract_calls(arg, aliases, out);
            }
        }
        // Leaves and declaration shapes carry no calls.
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::raw::WithClause;

    fn var(name: &str) -> RawNode {
        RawNode::Var {
            name: name.to_string(),
        }
    }

    fn qcall(module: &str, name: &str, args: Vec<RawNode>) -> RawNode {
        RawNode::QualifiedCall {
            module: module.to_string(),
            name: name.to_string(),
            args,
            position: None,
        }
    }

    fn call(name: &str, args: Vec<RawNode>) -> RawNode {
        RawNode::Call {
            name: name.to_string(),
            args,
            position: None,
        }
    }

    fn module(name: &str, body: Vec<RawNode>) -> RawNode {
        RawNode::Module {
            name: name.to_string(),
            body,
        }
    }

    fn function(name: &str, params: &[&str], body: Vec<RawNode>) -> RawNode {
        RawNode::Function {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body,
        }
    }

    fn calls_of(block: &ModuleBlock, idx: usize) -> Vec<(Option<String>, String, usize)> {
        block.functions[idx]
            .calls
            .iter()
            .map(|c| {
                (
                    c.module.as_ref().map(|m| m.to_string()),
                    c.name.clone(),
                    c.arity,
                )
            })
            .collect()
    }

    #[test]
    fn rejects_non_module_root() {
        let err = AstNormalizer::normalize(&var("x")).unwrap_err();
        assert_eq!(err, NormalizeError::NotAModule { found: "var" });
    }

    #[test]
    fn rejects_unnamed_module() {
        let err = AstNormalizer::normalize(&module("", vec![])).unwrap_err();
        assert_eq!(err, NormalizeError::UnnamedModule);
    }

    #[test]
    fn qualified_call_records_module_and_arity() {
        let tree = module(
            "Math",
            vec![function(
                "add",
                &["a", "b"],
                vec![qcall("Kernel", "+", vec![var("a"), var("b")])],
            )],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        assert_eq!(block.name.to_string(), "Math");
        assert_eq!(
            calls_of(&block, 0),
            vec![(Some("Kernel".to_string()), "+".to_string(), 2)]
        );
    }

    #[test]
    fn clauses_sharing_a_name_stay_separate() {
        let tree = module(
            "M",
            vec![
                function("f", &["x"], vec![call("first", vec![])]),
                function("f", &["x"], vec![call("second", vec![])]),
            ],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        assert_eq!(block.functions.len(), 2);
        assert_eq!(block.functions[0].calls[0].name, "first");
        assert_eq!(block.functions[1].calls[0].name, "second");
    }

    #[test]
    fn simple_alias_resolves_to_full_name() {
        let tree = module(
            "M",
            vec![
                RawNode::Alias {
                    target: "MyApp.Services.Mailer".to_string(),
                    rename: None,
                },
                function("go", &[], vec![qcall("Mailer", "send", vec![var("msg")])]),
            ],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        assert_eq!(
            calls_of(&block, 0),
            vec![(
                Some("MyApp.Services.Mailer".to_string()),
                "send".to_string(),
                1
            )]
        );
    }

    #[test]
    fn renamed_alias_resolves_the_rename_only() {
        let tree = module(
            "M",
            vec![
                RawNode::Alias {
                    target: "MyApp.Repo".to_string(),
                    rename: Some("DB".to_string()),
                },
                function(
                    "go",
                    &[],
                    vec![
                        qcall("DB", "all", vec![]),
                        // "Repo" was not bound; it passes through untouched.
                        qcall("Repo", "one", vec![]),
                    ],
                ),
            ],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        assert_eq!(
            calls_of(&block, 0),
            vec![
                (Some("MyApp.Repo".to_string()), "all".to_string(), 0),
                (Some("Repo".to_string()), "one".to_string(), 0),
            ]
        );
    }

    #[test]
    fn grouped_alias_binds_each_target() {
        let tree = module(
            "M",
            vec![
                RawNode::AliasGroup {
                    prefix: "MyApp.Workers".to_string(),
                    suffixes: vec!["Fetcher".to_string(), "Parser".to_string()],
                },
                function(
                    "go",
                    &[],
                    vec![
                        qcall("Fetcher", "run", vec![]),
                        qcall("Parser", "run", vec![]),
                    ],
                ),
            ],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        assert_eq!(
            calls_of(&block, 0),
            vec![
                (Some("MyApp.Workers.Fetcher".to_string()), "run".to_string(), 0),
                (Some("MyApp.Workers.Parser".to_string()), "run".to_string(), 0),
            ]
        );
    }

    #[test]
    fn alias_qualified_equals_fully_qualified() {
        let aliased = module(
            "M",
            vec![
                RawNode::Alias {
                    target: "A.B.C".to_string(),
                    rename: None,
                },
                function("go", &[], vec![qcall("C", "run", vec![var("x")])]),
            ],
        );
        let qualified = module(
            "M",
            vec![function("go", &[], vec![qcall("A.B.C", "run", vec![var("x")])])],
        );
        let a = AstNormalizer::normalize(&aliased).unwrap();
        let b = AstNormalizer::normalize(&qualified).unwrap();
        assert_eq!(a.functions[0].calls, b.functions[0].calls);
    }

    #[test]
    fn multi_segment_targets_bypass_the_alias_table() {
        let tree = module(
            "M",
            vec![
                RawNode::Alias {
                    target: "X.Y.Mailer".to_string(),
                    rename: None,
                },
                function("go", &[], vec![qcall("Other.Mailer", "send", vec![])]),
            ],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        assert_eq!(
            calls_of(&block, 0),
            vec![(Some("Other.Mailer".to_string()), "send".to_string(), 0)]
        );
    }

    #[test]
    fn pipeline_preserves_left_to_right_order() {
        // x |> f() |> g()
        let tree = module(
            "M",
            vec![function(
                "go",
                &["x"],
                vec![RawNode::Pipe {
                    lhs: Box::new(RawNode::Pipe {
                        lhs: Box::new(var("x")),
                        rhs: Box::new(call("f", vec![])),
                    }),
                    rhs: Box::new(call("g", vec![])),
                }],
            )],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        assert_eq!(
            calls_of(&block, 0),
            vec![(None, "f".to_string(), 1), (None, "g".to_string(), 1)]
        );
    }

    #[test]
    fn piped_qualified_call_counts_the_piped_value() {
        // x |> Enum.map(fun)
        let tree = module(
            "M",
            vec![function(
                "go",
                &["x"],
                vec![RawNode::Pipe {
                    lhs: Box::new(var("x")),
                    rhs: Box::new(qcall("Enum", "map", vec![var("fun")])),
                }],
            )],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        assert_eq!(
            calls_of(&block, 0),
            vec![(Some("Enum".to_string()), "map".to_string(), 2)]
        );
    }

    #[test]
    fn piped_bare_name_becomes_unary_call() {
        // x |> finish
        let tree = module(
            "M",
            vec![function(
                "go",
                &["x"],
                vec![RawNode::Pipe {
                    lhs: Box::new(var("x")),
                    rhs: Box::new(var("finish")),
                }],
            )],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        assert_eq!(calls_of(&block, 0), vec![(None, "finish".to_string(), 1)]);
    }

    #[test]
    fn with_chain_extracts_clauses_then_body_then_else() {
        let tree = module(
            "M",
            vec![function(
                "go",
                &[],
                vec![RawNode::With {
                    clauses: vec![
                        WithClause {
                            pattern: Some("{:ok, a}".to_string()),
                            expr: call("fetch", vec![]),
                        },
                        WithClause {
                            pattern: Some("{:ok, b}".to_string()),
                            expr: qcall("Decoder", "decode", vec![var("a")]),
                        },
                    ],
                    body: vec![call("use_both", vec![var("a"), var("b")])],
                    else_body: Some(vec![call("report_error", vec![])]),
                }],
            )],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        assert_eq!(
            calls_of(&block, 0),
            vec![
                (None, "fetch".to_string(), 0),
                (Some("Decoder".to_string()), "decode".to_string(), 1),
                (None, "use_both".to_string(), 2),
                (None, "report_error".to_string(), 0),
            ]
        );
    }

    #[test]
    fn grouped_and_sequence_literals_recurse_in_order() {
        let tree = module(
            "M",
            vec![function(
                "go",
                &[],
                vec![
                    RawNode::Tuple {
                        items: vec![call("a", vec![]), call("b", vec![])],
                    },
                    RawNode::List {
                        items: vec![call("c", vec![])],
                    },
                    RawNode::Block {
                        body: vec![call("d", vec![])],
                    },
                ],
            )],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        let names: Vec<String> = block.functions[0]
            .calls
            .iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn nested_calls_follow_the_enclosing_call() {
        // outer(inner())
        let tree = module(
            "M",
            vec![function(
                "go",
                &[],
                vec![qcall("A", "outer", vec![call("inner", vec![])])],
            )],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        assert_eq!(
            calls_of(&block, 0),
            vec![
                (Some("A".to_string()), "outer".to_string(), 1),
                (None, "inner".to_string(), 0),
            ]
        );
    }

    #[test]
    fn leaves_contribute_nothing() {
        let tree = module(
            "M",
            vec![function(
                "go",
                &[],
                vec![
                    var("x"),
                    RawNode::Literal {
                        value: serde_json::json!(42),
                    },
                ],
            )],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        assert!(block.functions[0].calls.is_empty());
    }

    #[test]
    fn attributes_are_collected_in_order() {
        let tree = module(
            "M",
            vec![
                RawNode::Attribute {
                    key: "moduledoc".to_string(),
                    value: "does things".to_string(),
                },
                RawNode::Attribute {
                    key: "vsn".to_string(),
                    value: "1".to_string(),
                },
            ],
        );
        let block = AstNormalizer::normalize(&tree).unwrap();
        let keys: Vec<&str> = block.attributes.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["moduledoc", "vsn"]);
    }
}
