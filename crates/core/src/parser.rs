//! Recursive-descent parser for the definition language.
//!
//! Grammar:
//!
//! ```text
//! Program      ::= { Command | Definition }
//! Command      ::= '#' Name CommandArg
//! CommandArg   ::= Name | QuotedString | Number
//! Definition   ::= AliasDef | SyntaxDef
//! AliasDef     ::= Name '=' Type
//! SyntaxDef    ::= Name '::=' NodeDef { '|' NodeDef }
//! NodeDef      ::= Name [ '(' [ FieldDef { ',' FieldDef } ] ')' ]
//! FieldDef     ::= Name ':' Type
//! Type         ::= Name { '[]' }
//! ```
//!
//! The parser runs with one token of lookahead and reports each
//! completed top-level construct to a [`ParseHandler`] before reading
//! the next token. Errors are fatal; there is no recovery.

use crate::ast::{Definition, FieldDef, NodeDef, TypeExpr};
use crate::error::SyntaxError;
use crate::lexer::{self, Spanned, Token, Tokenizer};

/// Characters reserved for operators. A word containing any of them is
/// never a name, so identifiers and operators cannot be confused.
const OP_CHARS: [char; 4] = [':', '=', '[', ']'];

/// Callbacks invoked by the parser as top-level constructs complete, in
/// document order.
pub trait ParseHandler {
    /// Called once per `# name value` command.
    fn handle_command(&mut self, name: &str, value: &str);
    /// Called once per completed definition, before the next token is
    /// read.
    fn handle_definition(&mut self, def: Definition);
}

/// Parse `src`, reporting commands and definitions to `handler`.
pub fn parse(src: &str, filename: &str, handler: &mut dyn ParseHandler) -> Result<(), SyntaxError> {
    Parser::new(src, filename).run(handler)
}

struct Parser {
    tokens: Tokenizer,
    cur: Spanned,
    filename: String,
}

impl Parser {
    fn new(src: &str, filename: &str) -> Self {
        let mut tokens = Tokenizer::new(src, filename);
        tokens.reset_syntax();
        tokens.set_class_range('\u{0000}', ' ', lexer::WHITESPACE);
        tokens.set_class_range('a', 'z', lexer::ID_LETTER);
        tokens.set_class_range('A', 'Z', lexer::ID_LETTER);
        tokens.set_class_chars("_", lexer::ID_LETTER);
        tokens.set_class_chars(":=[]", lexer::OP_LETTER);
        tokens.set_class_chars("'\"", lexer::QUOTE);
        tokens.set_class_chars("\\", lexer::ESCAPE);
        tokens.set_class_range('0', '9', lexer::DIGIT);
        tokens.set_class_chars("/", lexer::COMMENT_OPEN);
        tokens.set_class_chars("*", lexer::COMMENT_CLOSE);
        tokens.use_block_comments(true);
        tokens.use_line_comments(true);
        Parser {
            filename: filename.to_owned(),
            tokens,
            cur: Spanned {
                token: Token::Eof,
                line: 0,
            },
        }
    }

    fn advance(&mut self) -> Result<(), SyntaxError> {
        self.cur = self.tokens.next_token()?;
        Ok(())
    }

    fn line(&self) -> u32 {
        self.cur.line
    }

    fn err(&self, msg: impl Into<String>) -> SyntaxError {
        SyntaxError::parse(&self.filename, self.line(), msg)
    }

    fn looking_at_char(&self, c: char) -> bool {
        self.cur.token == Token::Char(c)
    }

    fn looking_at_word(&self, w: &str) -> bool {
        matches!(&self.cur.token, Token::Word(x) if x == w)
    }

    fn looking_at_name(&self) -> bool {
        matches!(&self.cur.token, Token::Word(w) if !w.contains(|c| OP_CHARS.contains(&c)))
    }

    fn take_name(&mut self) -> Result<String, SyntaxError> {
        if self.looking_at_name() {
            if let Token::Word(w) = &self.cur.token {
                let name = w.clone();
                self.advance()?;
                return Ok(name);
            }
        }
        Err(self.err(format!("expected a name, got {}", self.cur.token)))
    }

    // -- Productions --------------------------------------------

    // Program ::= { Command | Definition }
    fn run(mut self, handler: &mut dyn ParseHandler) -> Result<(), SyntaxError> {
        self.advance()?;
        loop {
            if self.looking_at_char('#') {
                self.parse_command(handler)?;
            } else if self.looking_at_name() {
                let def = self.parse_definition()?;
                handler.handle_definition(def);
            } else {
                break;
            }
        }
        if self.cur.token != Token::Eof {
            return Err(self.err(format!("unexpected {}", self.cur.token)));
        }
        Ok(())
    }

    // Command ::= '#' Name CommandArg
    // CommandArg ::= Name | QuotedString | Number
    fn parse_command(&mut self, handler: &mut dyn ParseHandler) -> Result<(), SyntaxError> {
        self.advance()?;
        if !self.looking_at_name() {
            return Err(self.err(format!("bad command name, got {}", self.cur.token)));
        }
        let name = self.take_name()?;
        match &self.cur.token {
            Token::Number(n) => handler.handle_command(&name, &n.to_string()),
            Token::Quoted { value, .. } => handler.handle_command(&name, value),
            Token::Word(w) if self.looking_at_name() => handler.handle_command(&name, w),
            other => {
                return Err(self.err(format!(
                    "bad argument for command '{}', got {}",
                    name, other
                )))
            }
        }
        self.advance()?;
        Ok(())
    }

    // Definition ::= AliasDef | SyntaxDef
    // AliasDef ::= Name '=' Type
    // SyntaxDef ::= Name '::=' NodeDef { '|' NodeDef }
    fn parse_definition(&mut self) -> Result<Definition, SyntaxError> {
        let line = self.line();
        let name = self.take_name()?;
        if self.looking_at_word("=") {
            self.advance()?;
            if !self.looking_at_name() {
                return Err(self.err(format!(
                    "bad alias definition for '{}', got {}",
                    name, self.cur.token
                )));
            }
            let ty = self.parse_type()?;
            Ok(Definition::Alias { name, ty, line })
        } else if self.looking_at_word("::=") {
            self.advance()?;
            if !self.looking_at_name() {
                return Err(self.err(format!(
                    "bad syntax definition for '{}', got {}",
                    name, self.cur.token
                )));
            }
            let mut nodes = vec![self.parse_node_def()?];
            while self.looking_at_char('|') {
                self.advance()?;
                nodes.push(self.parse_node_def()?);
            }
            Ok(Definition::Syntax { name, nodes, line })
        } else {
            Err(self.err(format!(
                "bad definition for '{}', expected '=' or '::=', got {}",
                name, self.cur.token
            )))
        }
    }

    // NodeDef ::= Name [ '(' [ FieldDef { ',' FieldDef } ] ')' ]
    fn parse_node_def(&mut self) -> Result<NodeDef, SyntaxError> {
        let name = self.take_name()?;
        if !self.looking_at_char('(') {
            return Ok(NodeDef::Abstract { name });
        }
        self.advance()?;
        let mut fields = Vec::new();
        if self.looking_at_name() {
            fields.push(self.parse_field_def()?);
            while self.looking_at_char(',') {
                self.advance()?;
                if !self.looking_at_name() {
                    return Err(self.err(format!(
                        "bad field definition for '{}', got {}",
                        name, self.cur.token
                    )));
                }
                fields.push(self.parse_field_def()?);
            }
        }
        if !self.looking_at_char(')') {
            return Err(self.err(format!(
                "incomplete definition for '{}', got {}",
                name, self.cur.token
            )));
        }
        self.advance()?;
        Ok(NodeDef::Concrete { name, fields })
    }

    // FieldDef ::= Name ':' Type
    fn parse_field_def(&mut self) -> Result<FieldDef, SyntaxError> {
        let name = self.take_name()?;
        if !self.looking_at_word(":") {
            return Err(self.err(format!(
                "bad field definition for '{}', expected ':', got {}",
                name, self.cur.token
            )));
        }
        self.advance()?;
        let ty = self.parse_type()?;
        Ok(FieldDef { name, ty })
    }

    // Type ::= Name { '[]' }
    fn parse_type(&mut self) -> Result<TypeExpr, SyntaxError> {
        let name = self.take_name()?;
        let mut ty = TypeExpr::Prim(name);
        while self.looking_at_word("[]") {
            self.advance()?;
            ty = TypeExpr::Array(Box::new(ty));
        }
        Ok(ty)
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        commands: Vec<(String, String)>,
        defs: Vec<Definition>,
    }

    impl ParseHandler for Recorder {
        fn handle_command(&mut self, name: &str, value: &str) {
            self.commands.push((name.to_owned(), value.to_owned()));
        }

        fn handle_definition(&mut self, def: Definition) {
            self.defs.push(def);
        }
    }

    fn parse_ok(src: &str) -> Recorder {
        let mut r = Recorder::default();
        parse(src, "test.ast", &mut r).expect("parse failed");
        r
    }

    fn parse_err(src: &str) -> SyntaxError {
        let mut r = Recorder::default();
        parse(src, "test.ast", &mut r).expect_err("parse should fail")
    }

    fn prim(name: &str) -> TypeExpr {
        TypeExpr::Prim(name.to_owned())
    }

    fn field(name: &str, ty: TypeExpr) -> FieldDef {
        FieldDef {
            name: name.to_owned(),
            ty,
        }
    }

    #[test]
    fn single_alternative_with_own_name() {
        let r = parse_ok("Point ::= Point(x: int, y: int)");
        assert_eq!(r.defs.len(), 1);
        assert_eq!(
            r.defs[0],
            Definition::Syntax {
                name: "Point".to_owned(),
                nodes: vec![NodeDef::Concrete {
                    name: "Point".to_owned(),
                    fields: vec![field("x", prim("int")), field("y", prim("int"))],
                }],
                line: 1,
            }
        );
    }

    #[test]
    fn multiple_alternatives() {
        let r = parse_ok("Expr ::= Lit(val: int) | Add(l: Expr, r: Expr)");
        let Definition::Syntax { name, nodes, .. } = &r.defs[0] else {
            panic!("expected a syntax definition, got {:?}", r.defs[0]);
        };
        assert_eq!(name, "Expr");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].name(), "Lit");
        assert_eq!(nodes[1].name(), "Add");
        assert!(matches!(&nodes[1], NodeDef::Concrete { fields, .. } if fields.len() == 2));
    }

    #[test]
    fn abstract_alternative_has_no_parens() {
        let r = parse_ok("Expr ::= Lit(val: int) | BinOp");
        let Definition::Syntax { nodes, .. } = &r.defs[0] else {
            panic!("expected a syntax definition");
        };
        assert_eq!(
            nodes[1],
            NodeDef::Abstract {
                name: "BinOp".to_owned()
            }
        );
    }

    #[test]
    fn empty_field_list_is_concrete() {
        let r = parse_ok("Nil ::= Nil()");
        let Definition::Syntax { nodes, .. } = &r.defs[0] else {
            panic!("expected a syntax definition");
        };
        assert_eq!(
            nodes[0],
            NodeDef::Concrete {
                name: "Nil".to_owned(),
                fields: vec![],
            }
        );
    }

    #[test]
    fn alias_definition() {
        let r = parse_ok("id = String");
        assert_eq!(
            r.defs[0],
            Definition::Alias {
                name: "id".to_owned(),
                ty: prim("String"),
                line: 1,
            }
        );
    }

    #[test]
    fn array_types_nest() {
        let r = parse_ok("args = String[][]");
        let Definition::Alias { ty, .. } = &r.defs[0] else {
            panic!("expected an alias definition");
        };
        assert_eq!(
            *ty,
            TypeExpr::Array(Box::new(TypeExpr::Array(Box::new(prim("String")))))
        );
    }

    #[test]
    fn commands_report_in_document_order() {
        let r = parse_ok("#root Node\n#version \"1.0\"\n#max_depth 42\n");
        assert_eq!(
            r.commands,
            vec![
                ("root".to_owned(), "Node".to_owned()),
                ("version".to_owned(), "1.0".to_owned()),
                ("max_depth".to_owned(), "42".to_owned()),
            ]
        );
    }

    #[test]
    fn commands_and_definitions_interleave() {
        let r = parse_ok("#root Node\nPoint ::= Point(x: int)\n#visitor V\n");
        assert_eq!(r.commands.len(), 2);
        assert_eq!(r.defs.len(), 1);
    }

    #[test]
    fn comments_are_insignificant() {
        let r = parse_ok("/* shapes */\nPoint ::= // the only node\n  Point(x: int)\n");
        assert_eq!(r.defs.len(), 1);
    }

    #[test]
    fn missing_alternative_fails_with_line() {
        let err = parse_err("Foo ::=");
        assert_eq!(err.line, 1);
        assert!(err.message.contains("Foo"), "message: {}", err.message);
    }

    #[test]
    fn missing_alternative_after_bar_fails() {
        let err = parse_err("Expr ::= Lit(v: int) |\n");
        assert!(err.message.contains("name"), "message: {}", err.message);
    }

    #[test]
    fn field_without_colon_fails() {
        let err = parse_err("Point ::= Point(x int)");
        assert!(err.message.contains("x"), "message: {}", err.message);
    }

    #[test]
    fn unclosed_field_list_fails() {
        let err = parse_err("Point ::= Point(x: int");
        assert!(
            err.message.contains("incomplete"),
            "message: {}",
            err.message
        );
    }

    #[test]
    fn bad_command_argument_fails() {
        let err = parse_err("#root =");
        assert!(err.message.contains("root"), "message: {}", err.message);
    }

    #[test]
    fn operator_word_is_not_a_name() {
        let err = parse_err("= ::= x");
        assert!(
            err.message.contains("unexpected"),
            "message: {}",
            err.message
        );
    }

    #[test]
    fn trailing_garbage_fails() {
        let err = parse_err("Point ::= Point() )");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn error_reports_later_lines() {
        let err = parse_err("Point ::= Point(x: int)\n\nBroken ::=");
        assert_eq!(err.line, 3);
    }

    #[test]
    fn empty_input_is_valid() {
        let r = parse_ok("");
        assert!(r.defs.is_empty());
        assert!(r.commands.is_empty());
    }
}
