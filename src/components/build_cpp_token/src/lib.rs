mod number;
mod string;

use cpp_token::{Token, TokenKind};
use text::Cursor;

#[derive(Clone, Debug)]
pub struct Config {
    /// Whether `>>` lexes as one token. Disabled while inside
    /// template-argument scopes, where `Foo<Bar<X>>` needs two `>` tokens.
    pub tokenize_right_shift: bool,
    pub tokenize_preprocessor_directives: bool,
    pub tokenize_c_style_comments: bool,
    pub tokenize_line_comments: bool,
    pub tokenize_single_quoted_strings: bool,
    pub tokenize_double_quoted_strings: bool,
    pub allow_line_continuations_in_all_tokens: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tokenize_right_shift: true,
            tokenize_preprocessor_directives: false,
            tokenize_c_style_comments: true,
            tokenize_line_comments: true,
            tokenize_single_quoted_strings: true,
            tokenize_double_quoted_strings: true,
            allow_line_continuations_in_all_tokens: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct State {
    pub at_start_of_line: bool,
}

#[derive(Clone, Debug)]
pub struct LexError {
    pub input_offset: u32,
    pub message: String,
}

/// Pull-based tokenizer. The caller supplies a cursor over a source window;
/// `read_token` advances it past exactly one token and classifies it. A token
/// is always produced and the cursor always advances, so the caller never
/// stalls on bad input.
///
/// Lexical errors are accumulated and drained by the caller via
/// `take_errors`.
pub struct Tokenizer {
    pub config: Config,
    pub state: State,
    pub input_offset: u32,
    errors: Vec<LexError>,
}

impl Tokenizer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: State {
                at_start_of_line: true,
            },
            input_offset: 0,
            errors: Vec::new(),
        }
    }

    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    fn error(&mut self, token_start: usize, pos: usize, message: impl Into<String>) {
        self.errors.push(LexError {
            input_offset: self.input_offset + (pos - token_start) as u32,
            message: message.into(),
        });
    }

    // Skips a `\<newline>` splice when mid-token continuations are enabled,
    // then peeks the next byte.
    fn second_char(&self, cursor: &mut Cursor) -> Option<u8> {
        if self.config.allow_line_continuations_in_all_tokens
            && cursor.peek() == Some(b'\\')
            && cursor.peek_at(1) == Some(b'\n')
        {
            cursor.advance_by(2);
        }
        cursor.peek()
    }

    pub fn read_token(&mut self, cursor: &mut Cursor) -> Token {
        let input_offset = self.input_offset;
        let token_start = cursor.pos();

        if cursor.at_end() {
            return TokenKind::Eof.at(input_offset, "");
        }

        let was_at_start_of_line = self.state.at_start_of_line;
        self.state.at_start_of_line = false;

        let mut kind = None;
        loop {
            let c = match cursor.peek() {
                Some(c) => c,
                None => break,
            };

            match c {
                b'\n' | b'\r' | b'\t' | b' ' => {
                    // Coalesce the whitespace run while tracking whether a
                    // newline is crossed, which determines start-of-line for
                    // directive recognition.
                    kind = Some(TokenKind::Whitespace);
                    self.state.at_start_of_line = was_at_start_of_line;
                    while let Some(c) = cursor.peek() {
                        match c {
                            b'\n' => {
                                self.state.at_start_of_line = true;
                                cursor.advance();
                            }
                            b'\r' | b'\t' | b' ' => cursor.advance(),
                            b'\\'
                                if self.config.allow_line_continuations_in_all_tokens
                                    && cursor.peek_at(1) == Some(b'\n') =>
                            {
                                cursor.advance_by(2);
                            }
                            _ => break,
                        }
                    }
                }

                b'#' => {
                    cursor.advance();
                    if was_at_start_of_line && self.config.tokenize_preprocessor_directives {
                        kind = Some(TokenKind::PreprocessorDirective);
                        // The whole line is one token, honoring `\<newline>`
                        // continuations inside the directive.
                        while let Some(c) = cursor.peek() {
                            cursor.advance();
                            if c == b'\n' {
                                break;
                            }
                            if c == b'\\' && cursor.peek() == Some(b'\n') {
                                cursor.advance();
                            }
                        }
                        self.state.at_start_of_line = true;
                    } else if self.second_char(cursor) == Some(b'#') {
                        cursor.advance();
                        kind = Some(TokenKind::DoubleHash);
                    } else {
                        kind = Some(TokenKind::Hash);
                    }
                }

                b'/' => {
                    cursor.advance();
                    kind = Some(TokenKind::ForwardSlash);
                    match self.second_char(cursor) {
                        Some(b'/') if self.config.tokenize_line_comments => {
                            cursor.advance();
                            kind = Some(TokenKind::LineComment);
                            while let Some(c) = cursor.peek() {
                                cursor.advance();
                                if c == b'\n' {
                                    break;
                                }
                            }
                            self.state.at_start_of_line = true;
                        }
                        Some(b'*') if self.config.tokenize_c_style_comments => {
                            cursor.advance();
                            kind = Some(TokenKind::CStyleComment);
                            self.read_c_style_comment(cursor, token_start);
                        }
                        Some(b'=') => {
                            cursor.advance();
                            kind = Some(TokenKind::SlashEqual);
                        }
                        _ => (),
                    }
                }

                b'{' => kind = self.single(cursor, TokenKind::OpenCurly),
                b'}' => kind = self.single(cursor, TokenKind::CloseCurly),
                b'(' => kind = self.single(cursor, TokenKind::OpenParen),
                b')' => kind = self.single(cursor, TokenKind::CloseParen),
                b'[' => kind = self.single(cursor, TokenKind::OpenSquare),
                b']' => kind = self.single(cursor, TokenKind::CloseSquare),
                b';' => kind = self.single(cursor, TokenKind::Semicolon),
                b',' => kind = self.single(cursor, TokenKind::Comma),
                b'?' => kind = self.single(cursor, TokenKind::QuestionMark),
                b'%' => kind = self.single(cursor, TokenKind::Percent),
                b'~' => kind = self.single(cursor, TokenKind::Tilde),
                b'^' => kind = self.single(cursor, TokenKind::Caret),

                b'<' => {
                    cursor.advance();
                    kind = Some(TokenKind::OpenAngle);
                    match self.second_char(cursor) {
                        Some(b'<') => {
                            cursor.advance();
                            kind = Some(TokenKind::LeftShift);
                        }
                        Some(b'=') => {
                            cursor.advance();
                            kind = Some(TokenKind::LessThanOrEqual);
                        }
                        _ => (),
                    }
                }

                b'>' => {
                    cursor.advance();
                    kind = Some(TokenKind::CloseAngle);
                    match self.second_char(cursor) {
                        Some(b'>') if self.config.tokenize_right_shift => {
                            cursor.advance();
                            kind = Some(TokenKind::RightShift);
                        }
                        Some(b'=') => {
                            cursor.advance();
                            kind = Some(TokenKind::GreaterThanOrEqual);
                        }
                        _ => (),
                    }
                }

                b':' => {
                    cursor.advance();
                    kind = Some(TokenKind::SingleColon);
                    if self.second_char(cursor) == Some(b':') {
                        cursor.advance();
                        kind = Some(TokenKind::DoubleColon);
                    }
                }

                b'=' => {
                    cursor.advance();
                    kind = Some(TokenKind::SingleEqual);
                    if self.second_char(cursor) == Some(b'=') {
                        cursor.advance();
                        kind = Some(TokenKind::DoubleEqual);
                    }
                }

                b'*' => {
                    cursor.advance();
                    kind = Some(TokenKind::Star);
                    if self.second_char(cursor) == Some(b'=') {
                        cursor.advance();
                        kind = Some(TokenKind::StarEqual);
                    }
                }

                b'&' => {
                    cursor.advance();
                    kind = Some(TokenKind::SingleAmpersand);
                    if self.second_char(cursor) == Some(b'&') {
                        cursor.advance();
                        kind = Some(TokenKind::DoubleAmpersand);
                    }
                }

                b'|' => {
                    cursor.advance();
                    kind = Some(TokenKind::SingleVerticalBar);
                    if self.second_char(cursor) == Some(b'|') {
                        cursor.advance();
                        kind = Some(TokenKind::DoubleVerticalBar);
                    }
                }

                b'+' => {
                    cursor.advance();
                    kind = Some(TokenKind::SinglePlus);
                    match self.second_char(cursor) {
                        Some(b'+') => {
                            cursor.advance();
                            kind = Some(TokenKind::DoublePlus);
                        }
                        Some(b'=') => {
                            cursor.advance();
                            kind = Some(TokenKind::PlusEqual);
                        }
                        _ => (),
                    }
                }

                b'-' => {
                    cursor.advance();
                    kind = Some(TokenKind::SingleMinus);
                    match self.second_char(cursor) {
                        Some(b'-') => {
                            cursor.advance();
                            kind = Some(TokenKind::DoubleMinus);
                        }
                        Some(b'=') => {
                            cursor.advance();
                            kind = Some(TokenKind::MinusEqual);
                        }
                        Some(b'>') => {
                            cursor.advance();
                            kind = Some(TokenKind::Arrow);
                        }
                        _ => (),
                    }
                }

                b'.' => {
                    cursor.advance();
                    kind = Some(TokenKind::Dot);
                    if self.second_char(cursor) == Some(b'.') && cursor.peek_at(1) == Some(b'.') {
                        cursor.advance_by(2);
                        kind = Some(TokenKind::Ellipsis);
                    }
                }

                b'!' => {
                    cursor.advance();
                    kind = Some(TokenKind::Bang);
                    if self.second_char(cursor) == Some(b'=') {
                        cursor.advance();
                        kind = Some(TokenKind::NotEqual);
                    }
                }

                b'\'' if self.config.tokenize_single_quoted_strings => {
                    cursor.advance();
                    kind = Some(TokenKind::StringLiteral);
                    self.read_string_literal(cursor, token_start, b'\'');
                }

                b'"' if self.config.tokenize_double_quoted_strings => {
                    cursor.advance();
                    kind = Some(TokenKind::StringLiteral);
                    self.read_string_literal(cursor, token_start, b'"');
                }

                b'\\'
                    if self.config.allow_line_continuations_in_all_tokens
                        && cursor.peek_at(1) == Some(b'\n') =>
                {
                    cursor.advance_by(2);
                    continue;
                }

                _ => (),
            }
            break;
        }

        let kind = match kind {
            Some(kind) => kind,
            None => match cursor.peek() {
                Some(c) if c.is_ascii_digit() => {
                    number::read_numeric_literal(cursor);
                    TokenKind::NumericLiteral
                }
                Some(_) => self.read_identifier_or_literal(cursor, token_start),
                None => TokenKind::Eof,
            },
        };

        let text = String::from_utf8_lossy(cursor.slice(token_start, cursor.pos())).into_owned();
        self.input_offset += text.len() as u32;
        Token::new(kind, input_offset, text)
    }

    fn single(&self, cursor: &mut Cursor, kind: TokenKind) -> Option<TokenKind> {
        cursor.advance();
        Some(kind)
    }

    fn read_c_style_comment(&mut self, cursor: &mut Cursor, token_start: usize) {
        loop {
            match cursor.peek() {
                None => {
                    self.error(token_start, token_start, "unexpected end-of-file in C-style comment");
                    break;
                }
                Some(b'*') => {
                    cursor.advance();
                    match cursor.peek() {
                        None => {
                            self.error(
                                token_start,
                                token_start,
                                "unexpected end-of-file in C-style comment",
                            );
                            break;
                        }
                        Some(b'/') => {
                            cursor.advance();
                            break;
                        }
                        Some(_) => (),
                    }
                }
                Some(_) => cursor.advance(),
            }
        }
    }

    fn read_identifier_or_literal(&mut self, cursor: &mut Cursor, token_start: usize) -> TokenKind {
        let start = cursor.pos();
        loop {
            let c = match cursor.peek() {
                Some(c) => c,
                None => return TokenKind::Identifier,
            };

            if is_identifier_byte(c) {
                cursor.advance();
                continue;
            }

            if c == b'"' {
                if cursor.pos() == start + 1 && cursor.slice(start, start + 1) == b"R" {
                    self.read_raw_string_literal(cursor, token_start);
                } else {
                    // Treat the identifier as a string prefix.
                    cursor.advance();
                    self.read_string_literal(cursor, token_start, b'"');
                }
                return TokenKind::StringLiteral;
            }

            if cursor.pos() == start {
                // Garbage token; consume one byte so we never loop forever.
                self.error(token_start, cursor.pos(), "garbage characters encountered");
                cursor.advance();
                return TokenKind::Unrecognized;
            }
            return TokenKind::Identifier;
        }
    }

}

fn is_identifier_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$' || c >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut tokenizer = Tokenizer::new(Config {
            tokenize_preprocessor_directives: true,
            ..Config::default()
        });
        let mut cursor = Cursor::new(src, 0);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.read_token(&mut cursor);
            let done = token.is_end_of_file();
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, tokenizer.take_errors())
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn punctuation_longest_match() {
        let (tokens, errors) = lex("a<=b->c...");
        assert!(errors.is_empty());
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::LessThanOrEqual,
                TokenKind::Identifier,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::Ellipsis,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn offsets_accumulate_by_text_length() {
        let (tokens, _) = lex("int x;");
        let mut expected = 0;
        for token in &tokens {
            assert_eq!(token.input_offset, expected);
            expected += token.text.len() as u32;
        }
    }

    #[test]
    fn right_shift_config() {
        let (tokens, _) = lex("A<B<C>>");
        assert!(kinds(&tokens).contains(&TokenKind::RightShift));

        let mut tokenizer = Tokenizer::new(Config {
            tokenize_right_shift: false,
            ..Config::default()
        });
        let mut cursor = Cursor::new(">>", 0);
        assert_eq!(tokenizer.read_token(&mut cursor).kind, TokenKind::CloseAngle);
        assert_eq!(tokenizer.read_token(&mut cursor).kind, TokenKind::CloseAngle);
    }

    #[test]
    fn directive_consumes_whole_line() {
        let (tokens, _) = lex("#define X 1\nint");
        assert_eq!(tokens[0].kind, TokenKind::PreprocessorDirective);
        assert_eq!(tokens[0].text, "#define X 1\n");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "int");
    }

    #[test]
    fn directive_honors_line_continuation() {
        let (tokens, _) = lex("#define X \\\n  1\nint");
        assert_eq!(tokens[0].kind, TokenKind::PreprocessorDirective);
        assert_eq!(tokens[0].text, "#define X \\\n  1\n");
    }

    #[test]
    fn hash_mid_line_is_punctuation() {
        let (tokens, _) = lex("a # b ## c");
        let kinds = kinds(&tokens);
        assert!(kinds.contains(&TokenKind::Hash));
        assert!(kinds.contains(&TokenKind::DoubleHash));
    }

    #[test]
    fn string_literals() {
        let (tokens, errors) = lex(r#""hi \"there\"" 'c'"#);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, r#""hi \"there\"""#);
        assert_eq!(tokens[2].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[2].text, "'c'");
    }

    #[test]
    fn unterminated_string_reports_error_and_advances() {
        let (tokens, errors) = lex("\"abc\nint");
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].input_offset, 0);
        assert!(errors[0].message.contains("end-of-line in string literal"));
        assert!(kinds(&tokens).contains(&TokenKind::Identifier));
    }

    #[test]
    fn raw_string_literal() {
        let (tokens, errors) = lex(r#"R"xx(keep "this" raw)xx" next"#);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, r#"R"xx(keep "this" raw)xx""#);
        assert_eq!(tokens[2].text, "next");
    }

    #[test]
    fn raw_string_bad_delimiter() {
        let (_, errors) = lex("R\") (oops)\"");
        assert!(
            errors
                .iter()
                .any(|e| e.message == "invalid character in raw string delimiter")
        );
    }

    #[test]
    fn garbage_byte_advances_one() {
        let (tokens, errors) = lex("@@");
        assert_eq!(tokens[0].kind, TokenKind::Unrecognized);
        assert_eq!(tokens[0].text, "@");
        assert_eq!(tokens[1].kind, TokenKind::Unrecognized);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn numeric_literals() {
        let (tokens, _) = lex("0x1f 3.25f 10ULL 7");
        let numeric: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::NumericLiteral)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(numeric, vec!["0x1f", "3.25f", "10ULL", "7"]);
    }

    #[test]
    fn comments_and_whitespace() {
        let (tokens, _) = lex("a /* b */ // c\nd");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Whitespace,
                TokenKind::CStyleComment,
                TokenKind::Whitespace,
                TokenKind::LineComment,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_c_style_comment() {
        let (_, errors) = lex("/* never closed");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("C-style comment"));
    }

    #[test]
    fn identifier_accepts_dollar_and_utf8() {
        let (tokens, errors) = lex("$name über");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].text, "$name");
        assert_eq!(tokens[2].text, "über");
    }
}
