//! Grammar rules for parsing declaration source.
//!
//! The source is tokenized first, then a recursive-descent parser walks the
//! token list. Only declarations are kept; bodies, initializers and
//! expression-bodied members are skipped by bracket balancing.

use smallvec::SmallVec;

use mvgen_core::{
    ast::*,
    types::{PredefinedType, RefKind},
    ParseError,
};

use crate::lexer::{tokenize, Token, TokenKind};

/// Parse a complete source file.
pub fn parse(path: &str, input: &str) -> Result<SyntaxTree, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(input, &tokens);
    parser.parse_compilation_unit(path)
}

/// Stateful parser that tracks position in the token list.
struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token<'a>],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: &'a [Token<'a>]) -> Self {
        Self { source, tokens, pos: 0 }
    }

    /// Get current token, if any.
    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token<'a>> {
        self.tokens.get(self.pos + offset)
    }

    /// Advance to next token.
    fn advance(&mut self) {
        self.pos += 1;
    }

    fn at_punct(&self, punct: &str) -> bool {
        self.current().map_or(false, |t| t.is_punct(punct))
    }

    fn at_ident(&self, word: &str) -> bool {
        self.current().map_or(false, |t| t.is_ident(word))
    }

    fn eat_punct(&mut self, punct: &str) -> bool {
        if self.at_punct(punct) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn current_span(&self) -> Span {
        self.current()
            .or_else(|| self.tokens.last())
            .map(|t| t.span)
            .unwrap_or_default()
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_default()
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(token) => ParseError::UnexpectedToken {
                found: token.text.to_string(),
                expected: expected.to_string(),
                line: token.span.line,
                column: token.span.column,
            },
            None => ParseError::UnexpectedEof,
        }
    }

    fn expect_punct(&mut self, punct: &str) -> Result<Span, ParseError> {
        if self.at_punct(punct) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected(&format!("'{punct}'")))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<Token<'a>, ParseError> {
        match self.current() {
            Some(token) if token.kind == TokenKind::Ident => {
                let token = *token;
                self.advance();
                Ok(token)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Parse the full file.
    fn parse_compilation_unit(&mut self, path: &str) -> Result<SyntaxTree, ParseError> {
        let mut tree = SyntaxTree::new(path);
        let mut types = Vec::new();
        let mut usings = Vec::new();

        self.parse_namespace_body(&mut tree, None, &mut usings, false, &mut types)?;

        tree.types = types;
        Ok(tree)
    }

    /// Parse namespace members until end of input or, when `braced`, the closing brace.
    fn parse_namespace_body(
        &mut self,
        tree: &mut SyntaxTree,
        namespace: Option<String>,
        usings: &mut Vec<String>,
        braced: bool,
        types: &mut Vec<TypeDecl>,
    ) -> Result<(), ParseError> {
        let mut namespace = namespace;

        loop {
            let Some(token) = self.current() else {
                if braced {
                    return Err(ParseError::UnexpectedEof);
                }
                return Ok(());
            };

            if token.is_punct("}") {
                if braced {
                    self.advance();
                    return Ok(());
                }
                return Err(self.unexpected("declaration"));
            }

            if token.is_punct(";") {
                self.advance();
                continue;
            }

            if token.is_ident("global") && self.peek_at(1).map_or(false, |t| t.is_ident("using")) {
                self.advance();
                continue;
            }

            if token.is_ident("using") {
                if let Some(name) = self.parse_using_directive()? {
                    if namespace.is_none() && !braced {
                        tree.usings.push(name.clone());
                    }
                    usings.push(name);
                }
                continue;
            }

            if token.is_ident("extern") && self.peek_at(1).map_or(false, |t| t.is_ident("alias")) {
                self.skip_past(";");
                continue;
            }

            if token.is_ident("namespace") {
                self.advance();
                let name = self.parse_dotted_name()?;
                let full = match &namespace {
                    Some(outer) => format!("{outer}.{name}"),
                    None => name,
                };

                if self.eat_punct(";") {
                    namespace = Some(full);
                    continue;
                }

                self.expect_punct("{")?;
                let mut inner_usings = usings.clone();
                self.parse_namespace_body(tree, Some(full), &mut inner_usings, true, types)?;
                continue;
            }

            if token.is_punct("[") && self.is_global_attribute_list() {
                let attributes = self.parse_attribute_list()?;
                tree.assembly_attributes.extend(attributes);
                continue;
            }

            let scope = DeclScope {
                namespace: namespace.clone(),
                usings: usings.clone(),
                containing_types: Vec::new(),
            };
            if let Some(decl) = self.parse_type_or_skip(scope)? {
                types.push(decl);
            }
        }
    }

    /// `using X.Y;`, `using static X.Y;` or `using A = X.Y;` (aliases are not tracked).
    fn parse_using_directive(&mut self) -> Result<Option<String>, ParseError> {
        self.advance();
        if self.at_ident("static") {
            self.skip_past(";");
            return Ok(None);
        }
        if self.peek_at(1).map_or(false, |t| t.is_punct("=")) {
            self.skip_past(";");
            return Ok(None);
        }
        let name = self.parse_dotted_name()?;
        self.expect_punct(";")?;
        Ok(Some(name))
    }

    /// Parse `A.B.C`, skipping a leading `global::`.
    fn parse_dotted_name(&mut self) -> Result<String, ParseError> {
        if self.at_ident("global") && self.peek_at(1).map_or(false, |t| t.is_punct("::")) {
            self.pos += 2;
        }
        let mut name = self.expect_ident("name")?.text.to_string();
        while self.at_punct(".") {
            self.advance();
            name.push('.');
            name.push_str(self.expect_ident("name")?.text);
        }
        Ok(name)
    }

    fn is_global_attribute_list(&self) -> bool {
        matches!(
            (self.peek_at(1), self.peek_at(2)),
            (Some(target), Some(colon))
                if (target.is_ident("assembly") || target.is_ident("module")) && colon.is_punct(":")
        )
    }

    /// Parse a type declaration, or skip a declaration form that is not modelled.
    fn parse_type_or_skip(&mut self, scope: DeclScope) -> Result<Option<TypeDecl>, ParseError> {
        let start = self.current_span();
        let attributes = self.parse_attribute_lists()?;
        let modifiers = self.parse_modifiers();

        if let Some(keyword) = self.type_keyword() {
            return self
                .parse_type_decl(start, attributes, modifiers, keyword, scope)
                .map(Some);
        }

        if self.at_ident("delegate") {
            self.skip_past(";");
            return Ok(None);
        }

        Err(self.unexpected("type declaration"))
    }

    /// Recognize (and consume) a type-introducing keyword.
    fn type_keyword(&mut self) -> Option<TypeKeyword> {
        let token = self.current()?;
        let keyword = match token.text {
            "class" if token.kind == TokenKind::Ident => TypeKeyword::Class,
            "struct" if token.kind == TokenKind::Ident => TypeKeyword::Struct,
            "interface" if token.kind == TokenKind::Ident => TypeKeyword::Interface,
            "enum" if token.kind == TokenKind::Ident => TypeKeyword::Enum,
            "ref" if token.kind == TokenKind::Ident => {
                if !self.peek_at(1)?.is_ident("struct") {
                    return None;
                }
                self.advance();
                TypeKeyword::Struct
            }
            "record" if token.kind == TokenKind::Ident => {
                let next = self.peek_at(1)?;
                if next.is_ident("struct") {
                    self.advance();
                    TypeKeyword::RecordStruct
                } else if next.is_ident("class") {
                    self.advance();
                    TypeKeyword::Record
                } else if next.kind == TokenKind::Ident {
                    TypeKeyword::Record
                } else {
                    return None;
                }
            }
            _ => return None,
        };
        self.advance();
        Some(keyword)
    }

    fn parse_type_decl(
        &mut self,
        start: Span,
        attributes: Vec<AttributeSyntax>,
        modifiers: Modifiers,
        keyword: TypeKeyword,
        scope: DeclScope,
    ) -> Result<TypeDecl, ParseError> {
        let name = self.expect_ident("type name")?.text.to_string();
        let type_parameters = self.parse_type_parameter_list()?;

        if self.at_punct("(") {
            self.skip_balanced("(", ")")?;
        }

        let mut base_list = Vec::new();
        if self.eat_punct(":") {
            loop {
                let ty = self.parse_type()?;
                if self.at_punct("(") {
                    self.skip_balanced("(", ")")?;
                }
                base_list.push(ty);
                if !self.eat_punct(",") {
                    break;
                }
            }
        }

        self.skip_constraint_clauses();

        let mut decl = TypeDecl {
            keyword,
            name,
            type_parameters,
            modifiers,
            attributes,
            base_list,
            members: Vec::new(),
            scope,
            span: start,
        };

        if self.eat_punct(";") {
            decl.span = start.to(self.previous_span());
            return Ok(decl);
        }

        if !self.at_punct("{") {
            return Err(self.unexpected("'{'"));
        }

        if keyword == TypeKeyword::Enum {
            self.skip_balanced("{", "}")?;
        } else {
            self.advance();
            let member_scope = nested_scope(&decl);
            while !self.eat_punct("}") {
                if self.current().is_none() {
                    return Err(ParseError::UnexpectedEof);
                }
                if let Some(member) = self.parse_member(&decl.name, &member_scope)? {
                    decl.members.push(member);
                }
            }
        }

        self.eat_punct(";");
        decl.span = start.to(self.previous_span());
        Ok(decl)
    }

    /// Parse `<T, in U, out V>` after a type or method name.
    fn parse_type_parameter_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut parameters = Vec::new();
        if !self.eat_punct("<") {
            return Ok(parameters);
        }
        loop {
            self.parse_attribute_lists()?;
            if self.at_ident("in") || self.at_ident("out") {
                self.advance();
            }
            parameters.push(self.expect_ident("type parameter")?.text.to_string());
            if self.eat_punct(">") {
                return Ok(parameters);
            }
            self.expect_punct(",")?;
        }
    }

    /// Skip `where T : ...` clauses.
    fn skip_constraint_clauses(&mut self) {
        while self.at_ident("where") {
            while let Some(token) = self.current() {
                if token.is_punct("{") || token.is_punct(";") || token.is_punct("=>") {
                    break;
                }
                self.advance();
            }
        }
    }

    /// Parse one member of a type body.
    fn parse_member(
        &mut self,
        type_name: &str,
        scope: &DeclScope,
    ) -> Result<Option<MemberDecl>, ParseError> {
        if self.eat_punct(";") {
            return Ok(None);
        }

        let start = self.current_span();
        let attributes = self.parse_attribute_lists()?;
        let modifiers = self.parse_modifiers();

        if let Some(keyword) = self.type_keyword() {
            let nested = self.parse_type_decl(start, attributes, modifiers, keyword, scope.clone())?;
            return Ok(Some(MemberDecl::Type(nested)));
        }

        if self.at_ident("delegate")
            || self.at_ident("event")
            || self.at_ident("implicit")
            || self.at_ident("explicit")
            || self.at_punct("~")
            || self.at_ident("fixed")
        {
            self.skip_member()?;
            return Ok(None);
        }

        // Constructor
        if self.at_ident(type_name) && self.peek_at(1).map_or(false, |t| t.is_punct("(")) {
            self.skip_member()?;
            return Ok(None);
        }

        // `ref` and `ref readonly` returns
        if self.at_ident("ref") {
            self.advance();
            if self.at_ident("readonly") {
                self.advance();
            }
        }

        let ty = self.parse_type()?;

        if self.at_ident("operator") || self.at_ident("this") {
            self.skip_member()?;
            return Ok(None);
        }

        let mut name_token = self.expect_ident("member name")?;
        // Explicit interface implementation: keep the last segment
        while self.at_punct(".") && self.peek_at(1).map_or(false, |t| t.kind == TokenKind::Ident) {
            self.advance();
            name_token = self.expect_ident("member name")?;
        }
        let name = name_token.text.to_string();

        if self.at_punct("<") || self.at_punct("(") {
            let type_parameters = self.parse_type_parameter_list()?;
            let parameters = self.parse_parameter_list()?;
            self.skip_constraint_clauses();
            let has_body = self.skip_method_body()?;
            return Ok(Some(MemberDecl::Method(MethodDecl {
                attributes,
                modifiers,
                return_type: ty,
                name,
                type_parameters,
                parameters,
                has_body,
                span: start.to(self.previous_span()),
            })));
        }

        if self.at_punct("{") {
            self.skip_balanced("{", "}")?;
            if self.at_punct("=") {
                self.skip_past(";");
            }
            return Ok(Some(MemberDecl::Property(PropertyDecl {
                attributes,
                modifiers,
                ty,
                name,
                span: start.to(self.previous_span()),
            })));
        }

        if self.at_punct("=>") {
            self.skip_past(";");
            return Ok(Some(MemberDecl::Property(PropertyDecl {
                attributes,
                modifiers,
                ty,
                name,
                span: start.to(self.previous_span()),
            })));
        }

        let mut variables: SmallVec<[Identifier; 1]> = SmallVec::new();
        variables.push(Identifier { name, span: name_token.span });
        self.parse_field_declarators(&mut variables)?;

        Ok(Some(MemberDecl::Field(FieldDecl {
            attributes,
            modifiers,
            ty,
            variables,
            span: start.to(self.previous_span()),
        })))
    }

    /// Parse the remainder of a field declaration after its first name.
    fn parse_field_declarators(
        &mut self,
        variables: &mut SmallVec<[Identifier; 1]>,
    ) -> Result<(), ParseError> {
        loop {
            if self.eat_punct(";") {
                return Ok(());
            }
            if self.eat_punct("=") {
                self.skip_expression()?;
                continue;
            }
            if self.eat_punct(",") {
                let is_declarator = matches!(
                    (self.current(), self.peek_at(1)),
                    (Some(name), Some(next))
                        if name.kind == TokenKind::Ident
                            && (next.is_punct("=") || next.is_punct(",") || next.is_punct(";"))
                );
                if is_declarator {
                    let token = self.expect_ident("field name")?;
                    variables.push(Identifier { name: token.text.to_string(), span: token.span });
                } else {
                    // A comma inside a generic initializer expression
                    self.skip_expression()?;
                }
                continue;
            }
            return Err(self.unexpected("';'"));
        }
    }

    /// Skip an expression up to (not including) a top-level `,` or `;`.
    fn skip_expression(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        while let Some(token) = self.current() {
            if token.kind == TokenKind::Punct {
                match token.text {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => {
                        if depth == 0 {
                            return Err(self.unexpected("expression"));
                        }
                        depth -= 1;
                    }
                    "," | ";" if depth == 0 => return Ok(()),
                    _ => {}
                }
            }
            self.advance();
        }
        Err(ParseError::UnexpectedEof)
    }

    /// Skip a method body; returns whether one was present.
    fn skip_method_body(&mut self) -> Result<bool, ParseError> {
        if self.eat_punct(";") {
            return Ok(false);
        }
        if self.at_punct("{") {
            self.skip_balanced("{", "}")?;
            return Ok(true);
        }
        if self.at_punct("=>") {
            self.skip_past(";");
            return Ok(true);
        }
        Err(self.unexpected("method body"))
    }

    /// Skip a member this grammar does not model.
    fn skip_member(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        while let Some(token) = self.current() {
            if token.kind == TokenKind::Punct {
                match token.text {
                    "(" | "[" => depth += 1,
                    ")" | "]" => depth = depth.saturating_sub(1),
                    ";" if depth == 0 => {
                        self.advance();
                        return Ok(());
                    }
                    "{" if depth == 0 => {
                        self.skip_balanced("{", "}")?;
                        if self.at_punct("=") {
                            self.skip_past(";");
                        }
                        return Ok(());
                    }
                    "=>" if depth == 0 => {
                        self.skip_past(";");
                        return Ok(());
                    }
                    _ => {}
                }
            }
            self.advance();
        }
        Err(ParseError::UnexpectedEof)
    }

    /// Skip from an opening delimiter to its matching close (inclusive).
    fn skip_balanced(&mut self, open: &str, close: &str) -> Result<(), ParseError> {
        let opened_at = self.current_span();
        let mut depth = 0usize;
        while let Some(token) = self.current() {
            if token.is_punct(open) {
                depth += 1;
            } else if token.is_punct(close) {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    self.advance();
                    return Ok(());
                }
            }
            self.advance();
        }
        Err(ParseError::UnbalancedDelimiter {
            delimiter: open.chars().next().unwrap_or('{'),
            line: opened_at.line,
        })
    }

    /// Skip tokens through the next top-level occurrence of `punct`.
    fn skip_past(&mut self, punct: &str) {
        let mut depth = 0usize;
        while let Some(token) = self.current() {
            if token.kind == TokenKind::Punct {
                match token.text {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => depth = depth.saturating_sub(1),
                    text if text == punct && depth == 0 => {
                        self.advance();
                        return;
                    }
                    _ => {}
                }
            }
            self.advance();
        }
    }

    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::new();
        while let Some(token) = self.current() {
            if token.kind != TokenKind::Ident {
                break;
            }
            let Some(modifier) = Modifier::from_keyword(token.text) else {
                break;
            };
            // `new()` in an expression position never reaches here; `file`
            // and `required` only count when another keyword or name follows
            if matches!(modifier, Modifier::File | Modifier::Required)
                && !self.peek_at(1).map_or(false, |t| t.kind == TokenKind::Ident)
            {
                break;
            }
            modifiers.push(modifier);
            self.advance();
        }
        modifiers
    }

    /// Parse zero or more `[...]` attribute lists.
    fn parse_attribute_lists(&mut self) -> Result<Vec<AttributeSyntax>, ParseError> {
        let mut attributes = Vec::new();
        while self.at_punct("[") {
            attributes.extend(self.parse_attribute_list()?);
        }
        Ok(attributes)
    }

    /// Parse one `[target: A, B(x)]` list.
    fn parse_attribute_list(&mut self) -> Result<Vec<AttributeSyntax>, ParseError> {
        self.expect_punct("[")?;

        let mut target = None;
        if let (Some(word), Some(colon)) = (self.current(), self.peek_at(1)) {
            if word.kind == TokenKind::Ident && colon.is_punct(":") {
                target = AttributeTarget::from_keyword(word.text);
                if target.is_some() {
                    self.pos += 2;
                }
            }
        }

        let mut attributes = Vec::new();
        loop {
            let start = self.current_span();
            let name = self.parse_name()?;
            let mut arguments = SmallVec::new();
            if self.at_punct("(") {
                arguments = self.parse_attribute_arguments()?;
            }
            attributes.push(AttributeSyntax {
                target,
                name: name.to_string(),
                arguments,
                span: start.to(self.previous_span()),
            });

            if self.eat_punct("]") {
                return Ok(attributes);
            }
            self.expect_punct(",")?;
            if self.eat_punct("]") {
                return Ok(attributes);
            }
        }
    }

    /// Parse `(a, b: c, D = e)` into raw argument texts.
    fn parse_attribute_arguments(&mut self) -> Result<SmallVec<[String; 2]>, ParseError> {
        self.expect_punct("(")?;
        let mut arguments = SmallVec::new();
        if self.eat_punct(")") {
            return Ok(arguments);
        }

        let mut depth = 0usize;
        let mut first: Option<Span> = None;
        let mut last = Span::default();

        while let Some(token) = self.current() {
            let token = *token;
            if token.kind == TokenKind::Punct {
                match token.text {
                    "(" | "[" | "{" => depth += 1,
                    ")" if depth == 0 => {
                        if let Some(first) = first {
                            arguments.push(self.source[first.start..last.end].to_string());
                        }
                        self.advance();
                        return Ok(arguments);
                    }
                    ")" | "]" | "}" => depth = depth.saturating_sub(1),
                    "," if depth == 0 => {
                        if let Some(first) = first.take() {
                            arguments.push(self.source[first.start..last.end].to_string());
                        }
                        self.advance();
                        continue;
                    }
                    _ => {}
                }
            }
            if first.is_none() {
                first = Some(token.span);
            }
            last = token.span;
            self.advance();
        }

        Err(ParseError::UnexpectedEof)
    }

    /// Parse `(params)` of a method.
    fn parse_parameter_list(&mut self) -> Result<Vec<ParameterSyntax>, ParseError> {
        self.expect_punct("(")?;
        let mut parameters = Vec::new();
        if self.eat_punct(")") {
            return Ok(parameters);
        }

        loop {
            let start = self.current_span();
            let attributes = self.parse_attribute_lists()?;
            let mut ref_kind = RefKind::None;
            let mut is_params = false;

            loop {
                match self.current() {
                    Some(t) if t.is_ident("in") => ref_kind = RefKind::In,
                    Some(t) if t.is_ident("ref") => ref_kind = RefKind::Ref,
                    Some(t) if t.is_ident("out") => ref_kind = RefKind::Out,
                    Some(t) if t.is_ident("params") => is_params = true,
                    Some(t) if t.is_ident("this") || t.is_ident("scoped") => {}
                    Some(t) if t.is_ident("readonly") && ref_kind == RefKind::Ref => {
                        ref_kind = RefKind::In;
                    }
                    _ => break,
                }
                self.advance();
            }

            let ty = self.parse_type()?;
            let name = self.expect_ident("parameter name")?.text.to_string();
            if self.eat_punct("=") {
                self.skip_default_value()?;
            }

            parameters.push(ParameterSyntax {
                attributes,
                ref_kind,
                is_params,
                ty,
                name,
                span: start.to(self.previous_span()),
            });

            if self.eat_punct(")") {
                return Ok(parameters);
            }
            self.expect_punct(",")?;
        }
    }

    /// Skip a parameter default value up to the next top-level `,` or `)`.
    fn skip_default_value(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        while let Some(token) = self.current() {
            if token.kind == TokenKind::Punct {
                match token.text {
                    "(" | "[" | "{" => depth += 1,
                    "," if depth == 0 => return Ok(()),
                    ")" if depth == 0 => return Ok(()),
                    ")" | "]" | "}" => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            self.advance();
        }
        Err(ParseError::UnexpectedEof)
    }

    /// Parse a type: keyword, named, tuple, with `?`, `[]` and `*` suffixes.
    fn parse_type(&mut self) -> Result<TypeSyntax, ParseError> {
        let start = self.current_span();
        let token = *self.current().ok_or(ParseError::UnexpectedEof)?;

        let mut ty = if token.is_ident("void") {
            self.advance();
            TypeSyntax::Void(token.span)
        } else if let Some(predefined) = PredefinedType::from_keyword(token.text)
            .filter(|_| token.kind == TokenKind::Ident)
        {
            self.advance();
            TypeSyntax::Predefined(predefined, token.span)
        } else if token.is_punct("(") {
            self.parse_tuple_type()?
        } else if token.kind == TokenKind::Ident {
            TypeSyntax::Named(self.parse_name()?)
        } else {
            return Err(self.unexpected("type"));
        };

        loop {
            if self.at_punct("?") {
                self.advance();
                ty = TypeSyntax::Nullable {
                    inner: Box::new(ty),
                    span: start.to(self.previous_span()),
                };
            } else if self.at_punct("[")
                && self
                    .peek_at(1)
                    .map_or(false, |t| t.is_punct("]") || t.is_punct(","))
            {
                self.advance();
                let mut rank = 1u8;
                while self.eat_punct(",") {
                    rank = rank.saturating_add(1);
                }
                self.expect_punct("]")?;
                ty = TypeSyntax::Array {
                    element: Box::new(ty),
                    rank,
                    span: start.to(self.previous_span()),
                };
            } else if self.at_punct("*") {
                self.advance();
            } else {
                return Ok(ty);
            }
        }
    }

    /// `(int a, string b)` as `global::System.ValueTuple<int, string>`.
    fn parse_tuple_type(&mut self) -> Result<TypeSyntax, ParseError> {
        let start = self.expect_punct("(")?;
        let mut elements = Vec::new();
        loop {
            elements.push(self.parse_type()?);
            if self.current().map_or(false, |t| t.kind == TokenKind::Ident) {
                self.advance();
            }
            if self.eat_punct(")") {
                break;
            }
            self.expect_punct(",")?;
        }
        let span = start.to(self.previous_span());
        let mut segments = SmallVec::new();
        segments.push(NameSegment { name: "System".to_string(), type_arguments: Vec::new() });
        segments.push(NameSegment { name: "ValueTuple".to_string(), type_arguments: elements });
        Ok(TypeSyntax::Named(NameSyntax { global: true, segments, span }))
    }

    /// Parse a possibly qualified, possibly generic name.
    fn parse_name(&mut self) -> Result<NameSyntax, ParseError> {
        let start = self.current_span();
        let mut global = false;
        if self.peek_at(1).map_or(false, |t| t.is_punct("::")) {
            global = self.at_ident("global");
            self.pos += 2;
        }

        let mut segments = SmallVec::new();
        loop {
            let name = self.expect_ident("name")?.text.to_string();
            let mut type_arguments = Vec::new();
            if self.at_punct("<") {
                self.advance();
                loop {
                    type_arguments.push(self.parse_type()?);
                    if self.eat_punct(">") {
                        break;
                    }
                    self.expect_punct(",")?;
                }
            }
            segments.push(NameSegment { name, type_arguments });

            let continues = self.at_punct(".")
                && self.peek_at(1).map_or(false, |t| t.kind == TokenKind::Ident);
            if !continues {
                break;
            }
            self.advance();
        }

        Ok(NameSyntax {
            global,
            segments,
            span: start.to(self.previous_span()),
        })
    }
}

/// Scope for members of `decl` (nested types see `decl` as a containing type).
fn nested_scope(decl: &TypeDecl) -> DeclScope {
    let mut scope = decl.scope.clone();
    scope.containing_types.push(ContainingType {
        keyword: decl.keyword,
        name: decl.name.clone(),
        type_parameters: decl.type_parameters.clone(),
    });
    scope
}
