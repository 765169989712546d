use super::{next_token, parse, tokenize, Expression, LexError, ParseError, Token, TokenType as TT};
use expect_test::expect;

fn parse_string(input: &str) -> Result<Expression, ParseError> {
    let tokens = tokenize(input).expect("input should tokenize");
    parse(&tokens)
}

fn parse_tree_matches(input: &str, tree_repr: &str) {
    match parse_string(input) {
        Ok(tree) => assert_eq!(
            tree.render(),
            tree_repr,
            "\nFailed to parse \"{}\" into \"{}\"\n",
            input,
            tree_repr
        ),
        Err(err) => panic!("\nFailed to parse \"{input}\": {err}\n"),
    }
}

fn assert_raises_error(input: &str, check: impl Fn(&ParseError) -> bool) {
    match parse_string(input) {
        Ok(tree) => panic!("\"{input}\" parsed as \"{tree}\" but should fail"),
        Err(err) => assert!(check(&err), "unexpected error for \"{input}\": {err:?}"),
    }
}

fn token_types(input: &str) -> Vec<TT> {
    tokenize(input)
        .expect("input should tokenize")
        .iter()
        .map(Token::typ)
        .collect()
}

fn first_token(input: &str) -> (Token, &str) {
    next_token(input, None).expect("input should start with a token")
}

#[test]
fn test_next_token() {
    let (token, rest) = first_token("(+ 2 3)");
    assert_eq!(token.typ(), TT::LPAR);
    assert_eq!(rest, "+ 2 3)");

    let (token, rest) = first_token("+ 2.0 3)");
    assert_eq!(token.typ(), TT::PLUS);
    assert_eq!(rest, " 2.0 3)");

    let (token, rest) = first_token("2.0 3)");
    assert_eq!(token.number(), Some(2.0));
    assert_eq!(rest, " 3)");

    let (token, rest) = first_token(")");
    assert_eq!(token.typ(), TT::RPAR);
    assert_eq!(rest, "");

    let (token, rest) = first_token("-2.345");
    assert_eq!(token.number(), Some(-2.345));
    assert_eq!(rest, "");

    let (token, rest) = first_token("+4124.1 )");
    assert_eq!(token.number(), Some(4124.1));
    assert_eq!(rest, " )");

    assert_eq!(first_token("").0.typ(), TT::ENDMARKER);
    assert_eq!(first_token("   ").0.typ(), TT::ENDMARKER);
    assert_eq!(first_token("if 2 3 4").0.typ(), TT::IF);
    assert_eq!(first_token("and true").0.typ(), TT::AND);
    assert_eq!(first_token("or true").0.typ(), TT::OR);
    assert_eq!(first_token("not").0.typ(), TT::NOT);
    assert_eq!(first_token("define").0.typ(), TT::DEFINE);
    assert_eq!(first_token(">= 1 2").0.typ(), TT::GREATEREQUAL);
    assert_eq!(first_token("<= 1 2").0.typ(), TT::LESSEQUAL);
    assert_eq!(first_token("fib_2 3").0.lexeme(), "fib_2");
}

#[test]
fn test_number_payload_only_on_numbers() {
    let (token, _) = first_token("x");
    assert_eq!(token.typ(), TT::NAME);
    assert_eq!(token.number(), None);
    let (token, _) = first_token("0");
    assert_eq!(token.number(), Some(0.0));
    let (token, _) = first_token("0.5");
    assert_eq!(token.number(), Some(0.5));
    let (token, _) = first_token("7.");
    assert_eq!(token.number(), Some(7.0));
}

#[test]
fn test_operator_glued_to_number() {
    let (plus, rest) = first_token("+2)");
    assert_eq!(plus.number(), Some(2.0));
    assert_eq!(rest, ")");

    let (plus, rest) = first_token("+ ");
    assert_eq!(plus.typ(), TT::PLUS);
    assert!(next_token(rest, Some(&plus)).is_ok());

    let (plus, _) = first_token("+");
    assert!(matches!(
        next_token("+2)", Some(&plus)),
        Err(LexError::AmbiguousAdjacentToken { ref lexeme, .. }) if lexeme == "++2"
    ));
    assert!(matches!(
        tokenize("(++2 4)"),
        Err(LexError::AmbiguousAdjacentToken { .. })
    ));
    assert!(matches!(
        tokenize("(*2 3)"),
        Err(LexError::AmbiguousAdjacentToken { .. })
    ));
    assert!(matches!(
        tokenize("(+ 1 -0)"),
        Err(LexError::AmbiguousAdjacentToken { .. })
    ));
}

#[test]
fn test_tokenize() {
    assert_eq!(
        token_types("(+ 2 3)"),
        vec![TT::LPAR, TT::PLUS, TT::NUMBER, TT::NUMBER, TT::RPAR]
    );

    let tokens = tokenize("(+ +2 (- -3.0))").unwrap();
    assert_eq!(
        tokens.iter().map(Token::typ).collect::<Vec<_>>(),
        vec![
            TT::LPAR,
            TT::PLUS,
            TT::NUMBER,
            TT::LPAR,
            TT::MINUS,
            TT::NUMBER,
            TT::RPAR,
            TT::RPAR
        ]
    );
    assert_eq!(tokens[2].number(), Some(2.0));
    assert_eq!(tokens[5].number(), Some(-3.0));
    assert_eq!(tokens[5].lexeme(), "-3.0");

    // Leading zeros end a number.
    assert_eq!(token_types("05"), vec![TT::NUMBER, TT::NUMBER]);
    assert_eq!(token_types("(- 3-4)"), vec![TT::LPAR, TT::MINUS, TT::NUMBER, TT::NUMBER, TT::RPAR]);
}

#[test]
fn test_tokens_compare_without_position() {
    assert_eq!(tokenize("(+ 2 3)").unwrap(), tokenize("(+   2\t3 )").unwrap());
    assert_ne!(tokenize("(+ 2 3)").unwrap(), tokenize("(+ 2 4)").unwrap());
}

#[test]
fn test_end_of_input() {
    assert!(tokenize("").unwrap().is_empty());
    assert!(tokenize(" \t ").unwrap().is_empty());
    assert_eq!(token_types("(+ 1 2)   ").len(), 5);
}

#[test]
fn test_keywords_need_word_boundary() {
    assert_eq!(token_types("order"), vec![TT::NAME]);
    assert_eq!(token_types("notify"), vec![TT::NAME]);
    assert_eq!(token_types("iffy"), vec![TT::NAME]);
    assert_eq!(token_types("truest"), vec![TT::NAME]);
    assert_eq!(token_types("defined"), vec![TT::NAME]);
    assert_eq!(token_types("(not)"), vec![TT::LPAR, TT::NOT, TT::RPAR]);
    assert_eq!(token_types("(and true)"), vec![TT::LPAR, TT::AND, TT::TRUE, TT::RPAR]);
}

#[test]
fn test_invalid_token() {
    match tokenize("(+ 2 #)") {
        Err(LexError::InvalidToken { remainder, .. }) => assert_eq!(remainder, "#)"),
        other => panic!("expected an invalid token, got {other:?}"),
    }
    assert!(matches!(tokenize("_x"), Err(LexError::InvalidToken { .. })));
    assert!(matches!(tokenize("(!= 1 2)"), Err(LexError::InvalidToken { .. })));
}

#[test]
fn test_lex_error_messages() {
    let err = tokenize("(+ 2 #)").unwrap_err();
    expect![["invalid token: #) at column 5 till column 7"]].assert_eq(&err.to_string());
    let err = tokenize("(*2 3)").unwrap_err();
    expect![[
        "invalid token: *2 at column 1 till column 3 (separate the operator from the number with a space)"
    ]]
    .assert_eq(&err.to_string());
}

#[test]
fn test_expressions() {
    parse_tree_matches("(+ 2 3)", "+ 2.00 3.00 ");
    parse_tree_matches("(+ +2 (- -3))", "+ 2.00 - -3.00 ");
    parse_tree_matches("2", "2.00 ");
    parse_tree_matches("true", "true ");
    parse_tree_matches("false", "false ");
    parse_tree_matches("x", "x ");
    parse_tree_matches("(+)", "+ ");
    parse_tree_matches("(*)", "* ");
    parse_tree_matches("(and false (/ 4 0))", "and false / 4.00 0.00 ");
    parse_tree_matches("(>= 4 true)", ">= 4.00 true ");
    parse_tree_matches("(define x 2)", "define x 2.00 ");
    parse_tree_matches("(define y (* x x))", "define y * x x ");
    parse_tree_matches("(fib 4)", "fib 4.00 ");
    parse_tree_matches("(f)", "f ");
}

#[test]
fn test_nested_render() {
    let tree = parse_string("(define (fib x) (if (<= x 1) x (+ (fib (- x 1)) (fib (- x 2)))))")
        .unwrap();
    expect![["define fib x if <= x 1.00 x + fib - x 1.00 fib - x 2.00 "]]
        .assert_eq(&tree.render());
    let tree = parse_string("(if (and (>= 1 2) (= 3 4)) (/ 1 0) (or true false))").unwrap();
    expect![["if and >= 1.00 2.00 = 3.00 4.00 / 1.00 0.00 or true false "]]
        .assert_eq(&tree.render());
}

#[test]
fn test_operation_shape() {
    match parse_string("(define (add a b) (+ a b))").unwrap() {
        Expression::Operation(head, operands, _) => {
            assert_eq!(head.as_str(), "define");
            assert_eq!(operands.len(), 2);
            match &operands[0] {
                Expression::Operation(name, params, _) => {
                    assert_eq!(name.as_str(), "add");
                    let params = params
                        .iter()
                        .filter_map(Expression::as_name)
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>();
                    assert_eq!(params, vec!["a", "b"]);
                }
                other => panic!("expected the procedure signature, got {other:?}"),
            }
        }
        other => panic!("expected an operation, got {other:?}"),
    }
}

#[test]
fn test_parse_errors() {
    assert_raises_error("", |e| matches!(e, ParseError::EmptyExpression));
    assert_raises_error("(-)", |e| matches!(e, ParseError::MissingOperand { .. }));
    assert_raises_error("(/)", |e| matches!(e, ParseError::MissingOperand { .. }));
    assert_raises_error("(2)", |e| matches!(e, ParseError::InvalidHead { .. }));
    assert_raises_error("( )", |e| matches!(e, ParseError::InvalidHead { .. }));
    assert_raises_error("((f) 2)", |e| matches!(e, ParseError::InvalidHead { .. }));
    assert_raises_error("(+ + 4)", |e| matches!(e, ParseError::DoubledOperator { .. }));
    assert_raises_error("(if and 2 3)", |e| {
        matches!(e, ParseError::DoubledOperator { .. })
    });
    assert_raises_error("(f + 4)", |e| matches!(e, ParseError::DoubledOperator { .. }));
    assert_raises_error("(- 2", |e| {
        matches!(e, ParseError::UnterminatedExpression { .. })
    });
    assert_raises_error("(", |e| {
        matches!(e, ParseError::UnterminatedExpression { .. })
    });
    assert_raises_error("(+ 1 (* 2 3)", |e| {
        matches!(e, ParseError::UnterminatedExpression { .. })
    });
    assert_raises_error("(+ 2 3) 4", |e| matches!(e, ParseError::TrailingTokens { .. }));
    assert_raises_error("(+ 2 3))", |e| matches!(e, ParseError::TrailingTokens { .. }));
    assert_raises_error("2 3", |e| matches!(e, ParseError::TrailingTokens { .. }));
    assert_raises_error("+ 2 )", |e| matches!(e, ParseError::UnexpectedToken { .. }));
    assert_raises_error(")", |e| matches!(e, ParseError::UnexpectedToken { .. }));
    assert_raises_error("(+ 2 - 2 3)", |e| {
        matches!(e, ParseError::UnexpectedToken { .. })
    });
}

#[test]
fn test_unary_minus_and_divide_with_operand() {
    parse_tree_matches("(- 9)", "- 9.00 ");
    parse_tree_matches("(/ 9)", "/ 9.00 ");
}

#[test]
fn test_parse_error_messages() {
    let err = parse_string("(2)").unwrap_err();
    expect![["left parenthesis should be followed by an operator or a name, found '2' at column 1"]]
        .assert_eq(&err.to_string());
    let err = parse_string("(+ + 4)").unwrap_err();
    expect![["'+' shouldn't be followed by operator '+' at column 1 till column 4"]]
        .assert_eq(&err.to_string());
    let err = parse_string("(- 2").unwrap_err();
    expect![["missing right parenthesis for expression starting at column 0 till column 4"]]
        .assert_eq(&err.to_string());
    let err = parse_string("(+ 2 3) 4 5").unwrap_err();
    expect![["there shouldn't be anything after the closing parenthesis, found '4' at column 8 till column 11"]]
        .assert_eq(&err.to_string());
}
