use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;

use tessera::{Cursor, Grammar, Match, Reference};

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

lazy_static! {
    /// Every line of a rendered match tree: a label, an offset and a length.
    static ref TREE_LINE_RE: Regex = Regex::new(r"^\s*\S+ @\d+\+\d+$").expect("regex");
}

/// Builds the arithmetic-expression grammar used throughout the suite:
/// `Expr := Value Suffix*` over numbers, variables and infix operators.
fn arithmetic_grammar() -> Result<Grammar> {
    let mut g = Grammar::new();
    let number = g.token(r"\d+")?;
    g.name(number, "NUMBER");
    let var = g.token(r"[a-z]\w*")?;
    g.name(var, "VAR");
    let op = g.token(r"[+\-*/]")?;
    g.name(op, "OP");

    let value = g.group([Reference::one(number), Reference::one(var)]);
    g.name(value, "Value");
    let suffix = g.rule([Reference::one(op), Reference::one(value)]);
    g.name(suffix, "Suffix");
    let expr = g.rule([
        Reference::one(value).named("head"),
        Reference::many_optional(suffix).named("tail"),
    ]);
    g.name(expr, "Expr");

    g.set_axiom(expr);
    g.prepare();
    Ok(g)
}

fn chain_lengths(m: &Match) -> Vec<usize> {
    m.children().map(Match::length).collect()
}

// -----------------------------------------------------------------------------
// End-to-end scenarios
// -----------------------------------------------------------------------------

#[test]
fn scenario_a_arithmetic_expression() -> Result<()> {
    let mut g = arithmetic_grammar()?;

    let m = g.parse_str("1+2*x")?.expect("expression should match");
    assert_eq!(m.offset(), 0);
    assert_eq!(m.length(), 5);

    // Child chain: Value("1") -> Suffix("+2") -> Suffix("*x").
    let children: Vec<&Match> = m.children().collect();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].element(), g.symbol("Value"));
    assert_eq!(children[0].length(), 1);
    assert_eq!(children[1].element(), g.symbol("Suffix"));
    assert_eq!(children[1].offset(), 1);
    assert_eq!(children[1].length(), 2);
    assert_eq!(children[2].element(), g.symbol("Suffix"));
    assert_eq!(children[2].offset(), 3);
    assert_eq!(children[2].length(), 2);

    // Reference names let consumers pick children out of the chain.
    assert_eq!(m.child_named("head").map(Match::length), Some(1));
    assert_eq!(m.child_named("tail").map(Match::offset), Some(1));
    Ok(())
}

#[test]
fn scenario_b_empty_many_optional() -> Result<()> {
    let mut g = Grammar::new();
    let var = g.token(r"\w+")?;
    let op = g.token(r"[+\-*/]")?;
    let rule = g.rule([Reference::one(var), Reference::many_optional(op)]);
    g.set_axiom(rule);

    let m = g.parse_str("x")?.expect("rule should match");
    assert_eq!(m.length(), 1);

    // Child chain: VAR("x") followed by the empty reference match.
    let children: Vec<&Match> = m.children().collect();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].element(), Some(var));
    assert!(children[1].is_empty());
    Ok(())
}

#[test]
fn scenario_c_failure_rewind() -> Result<()> {
    let mut g = Grammar::new();
    let foo = g.word("foo");
    let bar = g.word("bar");
    let rule = g.rule([Reference::one(foo), Reference::one(bar)]);
    g.set_axiom(rule);

    let mut cursor = Cursor::from_text("fooqux");
    assert!(g.parse_from_cursor(&mut cursor)?.is_none());
    assert_eq!(cursor.offset(), 0);
    Ok(())
}

#[test]
fn scenario_d_group_ordering() -> Result<()> {
    let mut g = Grammar::new();
    let ab = g.word("ab");
    let a = g.word("a");
    let group = g.group([Reference::one(ab), Reference::one(a)]);
    g.set_axiom(group);

    let m = g.parse_str("ab")?.expect("first branch should match");
    assert_eq!(m.length(), 2);
    assert_eq!(m.child().expect("branch").element(), Some(ab));

    let m = g.parse_str("a")?.expect("second branch should match");
    assert_eq!(m.length(), 1);
    assert_eq!(m.child().expect("branch").element(), Some(a));
    Ok(())
}

#[test]
fn scenario_e_recursive_grammar() -> Result<()> {
    let mut g = Grammar::new();
    let number = g.token(r"\d+")?;
    let comma = g.word(",");
    let list = g.rule(Vec::<Reference>::new());
    g.name(list, "List");
    let tail = g.rule([Reference::one(comma), Reference::one(list)]);
    g.set_children(list, [Reference::one(number), Reference::optional(tail)])?;
    g.set_axiom(list);

    let m = g.parse_str("1,2,3")?.expect("list should match");
    assert_eq!(m.length(), 5);

    // The tree is right-nested: one List match per element.
    let mut lists = 0;
    m.walk(&mut |node, _| {
        if node.element() == Some(list) {
            lists += 1;
        }
        true
    });
    assert_eq!(lists, 3);
    Ok(())
}

#[test]
fn scenario_f_skip_element() -> Result<()> {
    let mut g = Grammar::new();
    let ws = g.token(r"\s+")?;
    g.set_skip(ws);
    let number = g.token(r"\d+")?;
    let plus = g.word("+");
    let expr = g.rule([
        Reference::one(number),
        Reference::one(plus),
        Reference::one(number),
    ]);
    g.set_axiom(expr);

    let m = g.parse_str("1 + 2")?.expect("expression should match");
    assert_eq!(m.length(), 5);

    let children: Vec<&Match> = m.children().collect();
    assert_eq!(children.len(), 3);
    assert!(children.iter().all(|c| c.element() != Some(ws)));
    assert_eq!(chain_lengths(&m), vec![1, 1, 1]);
    Ok(())
}

// -----------------------------------------------------------------------------
// End-to-end extras
// -----------------------------------------------------------------------------

#[test]
fn walker_counts_all_nodes() -> Result<()> {
    let mut g = arithmetic_grammar()?;
    let m = g.parse_str("1+2*x")?.expect("expression should match");

    let mut visited = 0;
    let steps = m.walk(&mut |_, _| {
        visited += 1;
        true
    });
    assert_eq!(steps, visited);
    // Expr, the Value/Suffix chain (3), and the nodes under each chain
    // entry (1 + 3 + 3): eleven in all.
    assert_eq!(steps, 11);
    Ok(())
}

#[test]
fn tree_string_lines_are_well_formed() -> Result<()> {
    let mut g = arithmetic_grammar()?;
    let m = g.parse_str("1+2*x")?.expect("expression should match");

    let rendered = m.tree_string();
    assert!(!rendered.is_empty());
    for line in rendered.lines() {
        assert!(
            TREE_LINE_RE.is_match(line),
            "malformed tree line: {:?}",
            line
        );
    }
    Ok(())
}

#[test]
fn capture_groups_survive_into_the_tree() -> Result<()> {
    let mut g = Grammar::new();
    let pair = g.token(r"(\w+)=(\d+)")?;
    g.set_axiom(pair);

    let m = g.parse_str("answer=42")?.expect("pair should match");
    assert_eq!(m.capture_group(1), Some(&b"answer"[..]));
    assert_eq!(m.capture_group(2), Some(&b"42"[..]));
    Ok(())
}

#[test]
fn grammar_reuse_across_parses() -> Result<()> {
    let mut g = arithmetic_grammar()?;
    for (input, expected) in [("1", 1), ("1+2", 3), ("a*b/c", 5)] {
        let m = g.parse_str(input)?.expect("expression should match");
        assert_eq!(m.length(), expected, "input {:?}", input);
    }
    assert!(g.parse_str("+")?.is_none());
    Ok(())
}

#[test]
fn partial_recognition_is_reported_not_failed() -> Result<()> {
    let mut g = arithmetic_grammar()?;
    let mut cursor = Cursor::from_text("1+2 trailing");
    let m = g.parse_from_cursor(&mut cursor)?.expect("prefix matches");
    assert_eq!(m.length(), 3);
    assert!(cursor.has_more());
    assert_eq!(m.offset() + m.length(), cursor.offset());
    Ok(())
}
