use tessera::{Grammar, Match, Reference};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Arithmetic Grammar Demo ===\n");

    // Example 1: build the expression grammar through the API.
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

    println!("1. Element graph ({} elements):", g.element_count());
    g.walk_elements(&mut |id, element, step| {
        println!(
            "  [{:2}] {} {} ({})",
            step,
            id,
            element.name().unwrap_or("<anonymous>"),
            element.kind().tag()
        );
        true
    });
    println!();

    // Example 2: parse a few inputs and dump the match trees.
    println!("2. Parsing:");
    for input in ["1+2*x", "a", "7/q-2", "+oops"] {
        match g.parse_str(input)? {
            Some(m) => {
                println!("  {:?} matched {} bytes", input, m.length());
                for line in m.tree_string().lines() {
                    println!("    {}", line);
                }
            }
            None => println!("  {:?} did not match", input),
        }
    }
    println!();

    // Example 3: walk one tree and flatten it back to source order.
    println!("3. Leaf spans of \"1+2*x\":");
    let m = g.parse_str("1+2*x")?.expect("expression matches");
    m.walk(&mut |node: &Match, _| {
        if node.child().is_none() && !node.is_empty() {
            println!("  {}..{}", node.offset(), node.offset() + node.length());
        }
        true
    });

    Ok(())
}
