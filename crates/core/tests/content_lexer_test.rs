//! Tests for the content-stream tokenizer.

use estampa_core::parser::{ContentLexer, Token};

const TESTDATA: &[u8] = br#"%!comment
BT /F1 12 Tf 100 700 Td (Hello \(PDF\)) Tj ET
q 1 0 0 -1 0 792 cm <48690a> Tj
[ (A) -120 (B) ] TJ
<< /Type /XObject >> Q
"#;

#[test]
fn test_token_sequence() {
    let tokens: Vec<Token> = ContentLexer::new(TESTDATA).collect();

    assert_eq!(tokens[0], Token::Operator(b"BT".to_vec()));
    assert_eq!(tokens[1], Token::Name("F1".into()));
    assert_eq!(tokens[2], Token::Number(12.0));
    assert_eq!(tokens[3], Token::Operator(b"Tf".to_vec()));
    assert_eq!(tokens[6], Token::Operator(b"Td".to_vec()));
    assert_eq!(tokens[7], Token::LiteralString(b"Hello (PDF)".to_vec()));

    assert!(tokens.contains(&Token::HexString(b"Hi\n".to_vec())));
    assert!(tokens.contains(&Token::ArrayOpen));
    assert!(tokens.contains(&Token::Number(-120.0)));
    assert!(tokens.contains(&Token::ArrayClose));
    assert!(tokens.contains(&Token::DictOpen));
    assert!(tokens.contains(&Token::Name("XObject".into())));
    assert!(tokens.contains(&Token::DictClose));
    assert_eq!(tokens.last(), Some(&Token::Operator(b"Q".to_vec())));
}

#[test]
fn test_tokenization_is_idempotent() {
    let first: Vec<Token> = ContentLexer::new(TESTDATA).collect();
    let second: Vec<Token> = ContentLexer::new(TESTDATA).collect();
    assert_eq!(first, second);

    // A fresh lexer over the same bytes again after partial consumption
    // elsewhere must not be affected either.
    let mut partial = ContentLexer::new(TESTDATA);
    let _ = partial.next();
    let third: Vec<Token> = ContentLexer::new(TESTDATA).collect();
    assert_eq!(first, third);
}

#[test]
fn test_arbitrary_bytes_do_not_panic() {
    let garbage: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
    let tokens: Vec<Token> = ContentLexer::new(&garbage).collect();
    assert!(!tokens.is_empty());

    for case in [
        b"(never closed".as_slice(),
        b"<4 1".as_slice(),
        b">".as_slice(),
        b"/".as_slice(),
        b"\\".as_slice(),
        b"- + .".as_slice(),
    ] {
        let _: Vec<Token> = ContentLexer::new(case).collect();
    }
}

#[test]
fn test_operators_pass_through_unvalidated() {
    let tokens: Vec<Token> = ContentLexer::new(b"notanop 3 alsofake").collect();
    assert_eq!(tokens, vec![
        Token::Operator(b"notanop".to_vec()),
        Token::Number(3.0),
        Token::Operator(b"alsofake".to_vec()),
    ]);
}
