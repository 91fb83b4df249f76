//! Parenthesization of nested condition groups.
//!
//! Rendered conditions are re-parsed with standard SQL precedence (AND binds
//! tighter than OR) and must evaluate to the same truth value as the tree
//! they were built from.

use std::sync::Arc;

use proptest::prelude::*;
use sqlweave::condition::{Condition, Conjunction};
use sqlweave::dialect::{MySql, Postgres, SqlDialect};
use sqlweave::fragment::Columns;
use sqlweave::{ParamMode, StatementBuilder};

const PREFIX_MYSQL: &str = "SELECT * FROM `t` WHERE ";
const PREFIX_POSTGRES: &str = "SELECT * FROM \"t\" WHERE ";

// ============================================================================
// Reference model
// ============================================================================

#[derive(Debug, Clone)]
enum Tree {
    Leaf(bool),
    Node(Conjunction, Vec<Tree>),
}

impl Tree {
    fn eval(&self) -> bool {
        match self {
            Tree::Leaf(b) => *b,
            Tree::Node(conjunction, children) if conjunction.is_and_like() => {
                children.iter().all(Tree::eval)
            }
            Tree::Node(_, children) => children.iter().any(Tree::eval),
        }
    }

    fn to_condition(&self) -> Condition {
        match self {
            Tree::Leaf(true) => Condition::raw("T"),
            Tree::Leaf(false) => Condition::raw("F"),
            Tree::Node(conjunction, children) => {
                Condition::group(*conjunction, children.iter().map(Tree::to_condition))
            }
        }
    }
}

fn conjunction() -> impl Strategy<Value = Conjunction> {
    prop_oneof![
        Just(Conjunction::And),
        Just(Conjunction::Or),
        Just(Conjunction::AndAlias),
        Just(Conjunction::OrAlias),
    ]
}

fn tree() -> impl Strategy<Value = Tree> {
    any::<bool>()
        .prop_map(Tree::Leaf)
        .prop_recursive(4, 48, 4, |inner| {
            (conjunction(), prop::collection::vec(inner, 1..4))
                .prop_map(|(conjunction, children)| Tree::Node(conjunction, children))
        })
}

/// Recursive-descent evaluator over `T`, `F`, AND/&&, OR/||, and parentheses.
struct Evaluator {
    tokens: Vec<String>,
    pos: usize,
}

impl Evaluator {
    fn eval(sql: &str) -> bool {
        let tokens = sql
            .replace('(', " ( ")
            .replace(')', " ) ")
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let mut evaluator = Evaluator { tokens, pos: 0 };
        let value = evaluator.or_expr();
        assert_eq!(evaluator.pos, evaluator.tokens.len(), "trailing tokens in {sql}");
        value
    }

    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> String {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    fn or_expr(&mut self) -> bool {
        let mut value = self.and_expr();
        while matches!(self.peek(), Some("OR" | "||")) {
            self.next();
            let rhs = self.and_expr();
            value = value || rhs;
        }
        value
    }

    fn and_expr(&mut self) -> bool {
        let mut value = self.atom();
        while matches!(self.peek(), Some("AND" | "&&")) {
            self.next();
            let rhs = self.atom();
            value = value && rhs;
        }
        value
    }

    fn atom(&mut self) -> bool {
        match self.next().as_str() {
            "T" => true,
            "F" => false,
            "(" => {
                let value = self.or_expr();
                assert_eq!(self.next(), ")");
                value
            }
            other => panic!("unexpected token {other}"),
        }
    }
}

fn render(dialect: Arc<dyn SqlDialect>, fragments: Vec<(Condition, Conjunction)>) -> String {
    let mut b = StatementBuilder::new(dialect, ParamMode::Positional);
    b.select("t", Columns::all());
    for (condition, conjunction) in fragments {
        b.where_with(condition, conjunction).unwrap();
    }
    b.build().unwrap().sql
}

fn where_clause(condition: Condition) -> String {
    let sql = render(Arc::new(MySql), vec![(condition, Conjunction::And)]);
    sql.strip_prefix(PREFIX_MYSQL).unwrap().to_string()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn rendered_tree_keeps_its_meaning(tree in tree()) {
        let sql = where_clause(tree.to_condition());
        prop_assert_eq!(Evaluator::eval(&sql), tree.eval(), "sql: {}", sql);
    }

    #[test]
    fn rendered_tree_keeps_its_meaning_with_mapped_aliases(tree in tree()) {
        let sql = render(Arc::new(Postgres), vec![(tree.to_condition(), Conjunction::And)]);
        let clause = sql.strip_prefix(PREFIX_POSTGRES).unwrap();
        prop_assert!(!clause.contains("&&") && !clause.contains("||"));
        prop_assert_eq!(Evaluator::eval(clause), tree.eval());
    }

    #[test]
    fn where_fragments_combine_left_to_right(
        fragments in prop::collection::vec((tree(), prop_oneof![Just(Conjunction::And), Just(Conjunction::Or)]), 1..4)
    ) {
        let sql = render(
            Arc::new(MySql),
            fragments
                .iter()
                .map(|(tree, conjunction)| (tree.to_condition(), *conjunction))
                .collect(),
        );
        let clause = sql.strip_prefix(PREFIX_MYSQL).unwrap();

        // Each fragment is a unit; the chain itself follows SQL precedence
        let mut or_terms = Vec::new();
        let mut run = true;
        for (i, (tree, conjunction)) in fragments.iter().enumerate() {
            if i > 0 && *conjunction == Conjunction::Or {
                or_terms.push(run);
                run = true;
            }
            run = run && tree.eval();
        }
        or_terms.push(run);
        let expected = or_terms.into_iter().any(|t| t);

        prop_assert_eq!(Evaluator::eval(clause), expected, "sql: {}", clause);
    }

    #[test]
    fn rendering_a_tree_twice_is_byte_identical(tree in tree()) {
        let condition = tree.to_condition();
        let first = render(Arc::new(Postgres), vec![(condition.clone(), Conjunction::And)]);
        let second = render(Arc::new(Postgres), vec![(condition, Conjunction::And)]);
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// Explicit cases
// ============================================================================

#[test]
fn test_and_inside_or_needs_no_parens() {
    let cond = Condition::any([
        Condition::raw("T"),
        Condition::all([Condition::raw("F"), Condition::raw("T")]),
    ]);
    assert_eq!(where_clause(cond), "T OR F AND T");
}

#[test]
fn test_or_inside_and_is_parenthesized() {
    let cond = Condition::all([
        Condition::raw("T"),
        Condition::any([Condition::raw("F"), Condition::raw("T")]),
    ]);
    assert_eq!(where_clause(cond), "T AND (F OR T)");
}

#[test]
fn test_or_alias_inside_and_alias() {
    let cond = Condition::group(
        Conjunction::AndAlias,
        [
            Condition::raw("T"),
            Condition::group(Conjunction::OrAlias, [Condition::raw("F"), Condition::raw("T")]),
        ],
    );
    assert_eq!(where_clause(cond), "T && (F || T)");
}

#[test]
fn test_or_inside_xor_is_parenthesized() {
    let cond = Condition::xor([
        Condition::raw("a"),
        Condition::any([Condition::raw("b"), Condition::raw("c")]),
    ]);
    assert_eq!(where_clause(cond), "a XOR (b OR c)");
}

#[test]
fn test_top_level_group_is_bare() {
    let cond = Condition::any([Condition::raw("a"), Condition::raw("b")]);
    assert_eq!(where_clause(cond), "a OR b");
}

#[test]
fn test_empty_groups_render_nothing() {
    let cond = Condition::all([Condition::raw("a"), Condition::any(Vec::new())]);
    assert_eq!(where_clause(cond), "a");

    let sql = render(Arc::new(MySql), vec![(Condition::all(Vec::new()), Conjunction::And)]);
    assert_eq!(sql, "SELECT * FROM `t`");
}

#[test]
fn test_multi_term_fragments_are_wrapped() {
    let sql = render(
        Arc::new(MySql),
        vec![
            (Condition::any([Condition::raw("a"), Condition::raw("b")]), Conjunction::And),
            (Condition::raw("c"), Conjunction::And),
        ],
    );
    assert_eq!(sql, "SELECT * FROM `t` WHERE (a OR b) AND c");
}

#[test]
fn test_needs_parens_table() {
    assert!(Conjunction::And.needs_parens_around(Conjunction::Or));
    assert!(Conjunction::Xor.needs_parens_around(Conjunction::OrAlias));
    assert!(Conjunction::AndAlias.needs_parens_around(Conjunction::Or));
    assert!(!Conjunction::Or.needs_parens_around(Conjunction::And));
    assert!(!Conjunction::And.needs_parens_around(Conjunction::And));
}
