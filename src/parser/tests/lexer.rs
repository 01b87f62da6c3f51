use crate::parser::{Lexer, LexerError, SourcePosition, Spanning, Token};

fn tokenize(s: &str) -> Vec<Spanning<Token<'_>>> {
    let mut tokens = Vec::new();

    for res in Lexer::new(s) {
        match res {
            Ok(t) => tokens.push(t),
            Err(e) => panic!("lexer error in {s:?}: {e}"),
        }
    }

    tokens
}

fn tokenize_single(s: &str) -> Spanning<Token<'_>> {
    let mut tokens = tokenize(s);
    assert_eq!(tokens.len(), 2, "expected a single token in {s:?}");
    assert_eq!(tokens[1].item, Token::EndOfFile);
    tokens.remove(0)
}

fn tokenize_error(s: &str) -> Spanning<LexerError> {
    for res in Lexer::new(s) {
        match res {
            Ok(_) => {}
            Err(e) => return e,
        }
    }
    panic!("expected a lexer error in {s:?}");
}

#[test]
fn empty_and_whitespace_only_sources() {
    for s in ["", "  \n\t ,,, \r\n", "\u{feff} "] {
        let tokens = tokenize(s);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].item, Token::EndOfFile);
    }
}

#[test]
fn skips_comments() {
    let tokens = tokenize("# line one\nfoo # trailing\n# last");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].item, Token::Name("foo"));
}

#[test]
fn names_and_keywords_are_plain_names() {
    for name in ["simple", "_underscore", "with_123_digits", "query", "null1"] {
        assert_eq!(tokenize_single(name).item, Token::Name(name));
    }
}

#[test]
fn tracks_positions() {
    let token = tokenize_single("\n\n  foo");
    assert_eq!(token.span.start, SourcePosition::new(4, 2, 2));
    assert_eq!(token.span.end, SourcePosition::new(7, 2, 5));
}

#[test]
fn strings_with_escapes() {
    assert_eq!(
        tokenize_single(r#""simple""#).item,
        Token::String("simple".into())
    );
    assert_eq!(
        tokenize_single(r#"" white space ""#).item,
        Token::String(" white space ".into())
    );
    assert_eq!(
        tokenize_single(r#""quote \"""#).item,
        Token::String("quote \"".into())
    );
    assert_eq!(
        tokenize_single(r#""escaped \n\r\b\t\f""#).item,
        Token::String("escaped \n\r\u{0008}\t\u{000c}".into())
    );
    assert_eq!(
        tokenize_single(r#""slashes \\ \/""#).item,
        Token::String("slashes \\ /".into())
    );
    assert_eq!(
        tokenize_single(r#""unicode ሴ噸邫췯""#).item,
        Token::String("unicode \u{1234}\u{5678}\u{90ab}\u{cdef}".into())
    );
}

#[test]
fn string_errors() {
    assert_eq!(tokenize_error("\"").item, LexerError::UnterminatedString);
    assert_eq!(
        tokenize_error("\"no end quote").item,
        LexerError::UnterminatedString
    );
    assert_eq!(
        tokenize_error("\"multi\nline\"").item,
        LexerError::UnterminatedString
    );
    assert_eq!(
        tokenize_error(r#""bad \z esc""#).item,
        LexerError::UnknownEscapeSequence("\\z".into())
    );
    assert_eq!(
        tokenize_error(r#""bad \x esc""#).item,
        LexerError::UnknownEscapeSequence("\\x".into())
    );
    assert_eq!(
        tokenize_error(r#""bad \u1 esc""#).item,
        LexerError::UnknownEscapeSequence("\\u1".into())
    );
    assert_eq!(
        tokenize_error("\"contains unescaped \u{0007} control char\"").item,
        LexerError::UnknownCharacterInString('\u{0007}')
    );
}

#[test]
fn block_strings_dedent() {
    assert_eq!(
        tokenize_single(r#""""simple""""#).item,
        Token::BlockString("simple".into())
    );
    assert_eq!(
        tokenize_single("\"\"\"\n    Hello,\n      World!\n\n    Yours,\n      GraphQL.\n  \"\"\"")
            .item,
        Token::BlockString("Hello,\n  World!\n\nYours,\n  GraphQL.".into())
    );
    assert_eq!(
        tokenize_single(r#""""contains \""" triple quote""""#).item,
        Token::BlockString(r#"contains """ triple quote"#.into())
    );
    assert_eq!(
        tokenize_single("\"\"\"multi\nline\"\"\"").item,
        Token::BlockString("multi\nline".into())
    );
}

#[test]
fn unterminated_block_string() {
    assert_eq!(
        tokenize_error("\"\"\"no end").item,
        LexerError::UnterminatedString
    );
}

#[test]
fn numbers() {
    assert_eq!(tokenize_single("4").item, Token::Int(4));
    assert_eq!(tokenize_single("0").item, Token::Int(0));
    assert_eq!(tokenize_single("-4").item, Token::Int(-4));
    assert_eq!(tokenize_single("9").item, Token::Int(9));
    assert_eq!(tokenize_single("4.123").item, Token::Float(4.123));
    assert_eq!(tokenize_single("-4.123").item, Token::Float(-4.123));
    assert_eq!(tokenize_single("0.123").item, Token::Float(0.123));
    assert_eq!(tokenize_single("123e4").item, Token::Float(123e4));
    assert_eq!(tokenize_single("123E4").item, Token::Float(123e4));
    assert_eq!(tokenize_single("123e-4").item, Token::Float(123e-4));
    assert_eq!(tokenize_single("123e+4").item, Token::Float(123e+4));
    assert_eq!(tokenize_single("-1.123e4567").item, Token::Float(f64::INFINITY * -1.0));
}

#[test]
fn number_errors() {
    assert_eq!(
        tokenize_error("00").item,
        LexerError::UnexpectedCharacter('0')
    );
    assert_eq!(tokenize_error("+1").item, LexerError::UnknownCharacter('+'));
    assert_eq!(
        tokenize_error("1.").item,
        LexerError::UnexpectedEndOfFile
    );
    assert_eq!(
        tokenize_error(".123").item,
        LexerError::UnexpectedCharacter('.')
    );
    assert_eq!(
        tokenize_error("1.A").item,
        LexerError::UnexpectedCharacter('A')
    );
    assert_eq!(
        tokenize_error("1.0e").item,
        LexerError::UnexpectedEndOfFile
    );
    assert_eq!(
        tokenize_error("1.0eA").item,
        LexerError::UnexpectedCharacter('A')
    );
    // Out of `i32` range.
    assert_eq!(tokenize_error("3000000000").item, LexerError::InvalidNumber);
}

#[test]
fn punctuation() {
    assert_eq!(tokenize_single("!").item, Token::ExclamationMark);
    assert_eq!(tokenize_single("$").item, Token::Dollar);
    assert_eq!(tokenize_single("&").item, Token::Amp);
    assert_eq!(tokenize_single("(").item, Token::ParenOpen);
    assert_eq!(tokenize_single(")").item, Token::ParenClose);
    assert_eq!(tokenize_single("...").item, Token::Ellipsis);
    assert_eq!(tokenize_single(":").item, Token::Colon);
    assert_eq!(tokenize_single("=").item, Token::Equals);
    assert_eq!(tokenize_single("@").item, Token::At);
    assert_eq!(tokenize_single("[").item, Token::BracketOpen);
    assert_eq!(tokenize_single("]").item, Token::BracketClose);
    assert_eq!(tokenize_single("{").item, Token::CurlyOpen);
    assert_eq!(tokenize_single("}").item, Token::CurlyClose);
    assert_eq!(tokenize_single("|").item, Token::Pipe);
}

#[test]
fn unknown_characters() {
    assert_eq!(tokenize_error("..").item, LexerError::UnexpectedEndOfFile);
    assert_eq!(tokenize_error("?").item, LexerError::UnknownCharacter('?'));
    assert_eq!(
        tokenize_error("\u{203b}").item,
        LexerError::UnknownCharacter('\u{203b}')
    );
}

#[test]
fn display_quotes_tokens() {
    assert_eq!(Token::Name("identifier").to_string(), "identifier");
    assert_eq!(Token::Int(123).to_string(), "123");
    assert_eq!(Token::Float(4.5).to_string(), "4.5");
    assert_eq!(
        Token::String(r#"hello "world""#.into()).to_string(),
        r#""hello \"world\"""#
    );
    assert_eq!(Token::Ellipsis.to_string(), "...");
}
