use tessera::meta::grammar_from_source;

const LISP_GRAMMAR: &str = r#"
    SPACE   := "\s+" ;
    NUMBER  := "-?\d+(\.\d+)?" ;
    NAME    := "[a-zA-Z][\w-]*" ;
    Atom    := NAME | NUMBER ;
    Items   := Value Items? ;
    List    := '(' Items? ')' ;
    Value   := List | Atom ;
    __axiom__ = Value ;
    __skip__  = SPACE ;
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Grammar-Definition Language Demo ===\n");

    let mut g = grammar_from_source(LISP_GRAMMAR)?;
    println!("Grammar built: {} elements\n", g.element_count());

    let inputs = [
        "(add 1 (mul -2 3))",
        "42",
        "(define answer\n  (mul 6 7))",
        "(unbalanced",
    ];

    for input in inputs {
        println!("input: {:?}", input);
        match g.parse_str(input)? {
            Some(m) if m.length() == input.len() => {
                println!("  matched all {} bytes", m.length());
            }
            Some(m) => {
                println!("  matched a {}-byte prefix", m.length());
            }
            None => println!("  no match"),
        }
    }

    Ok(())
}
