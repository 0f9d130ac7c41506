use lachs::Span;

#[lachs::token]
pub enum Token {
    #[terminal("let")]
    Let,
    #[terminal("rec")]
    Rec,
    #[terminal("and")]
    And,
    #[terminal("in")]
    In,
    #[terminal("fun")]
    Fun,
    #[terminal("if")]
    If,
    #[terminal("then")]
    Then,
    #[terminal("else")]
    Else,
    #[terminal("match")]
    Match,
    #[terminal("with")]
    With,
    #[terminal("true")]
    True,
    #[terminal("false")]
    False,
    #[literal("[']*[a-zA-Z][a-zA-Z0-9_']*")]
    Ident,
    #[literal("[0-9]*")]
    Integer,
    #[literal(r#""([^"\\]|\\.)*""#)]
    StringLiteral,
    #[terminal("->")]
    Arrow,
    #[terminal("=")]
    Equals,
    #[terminal("<>")]
    NotEquals,
    #[terminal("<=")]
    LessEquals,
    #[terminal(">=")]
    GreaterEquals,
    #[terminal("<")]
    Less,
    #[terminal(">")]
    Greater,
    #[terminal("&&")]
    AndAnd,
    #[terminal("::")]
    DoubleColon,
    #[terminal(":")]
    Colon,
    #[terminal(";;")]
    DoubleSemi,
    #[terminal(",")]
    Comma,
    #[terminal("|")]
    Pipe,
    #[terminal(";")]
    Semi,
    #[terminal("_")]
    Underscore,
    #[terminal("(")]
    LParen,
    #[terminal(")")]
    RParen,
    #[terminal("[")]
    LBracket,
    #[terminal("]")]
    RBracket,
    #[terminal("+")]
    Plus,
    #[terminal("-")]
    Minus,
    #[terminal("*")]
    Star,
    #[terminal("/")]
    Slash,
}

impl Token {
    pub fn pos(&self) -> Span {
        match self {
            Token::Let(inner) => inner.position.clone(),
            Token::Rec(inner) => inner.position.clone(),
            Token::And(inner) => inner.position.clone(),
            Token::In(inner) => inner.position.clone(),
            Token::Fun(inner) => inner.position.clone(),
            Token::If(inner) => inner.position.clone(),
            Token::Then(inner) => inner.position.clone(),
            Token::Else(inner) => inner.position.clone(),
            Token::Match(inner) => inner.position.clone(),
            Token::With(inner) => inner.position.clone(),
            Token::True(inner) => inner.position.clone(),
            Token::False(inner) => inner.position.clone(),
            Token::Ident(inner) => inner.position.clone(),
            Token::Integer(inner) => inner.position.clone(),
            Token::StringLiteral(inner) => inner.position.clone(),
            Token::Arrow(inner) => inner.position.clone(),
            Token::Equals(inner) => inner.position.clone(),
            Token::NotEquals(inner) => inner.position.clone(),
            Token::LessEquals(inner) => inner.position.clone(),
            Token::GreaterEquals(inner) => inner.position.clone(),
            Token::Less(inner) => inner.position.clone(),
            Token::Greater(inner) => inner.position.clone(),
            Token::AndAnd(inner) => inner.position.clone(),
            Token::DoubleColon(inner) => inner.position.clone(),
            Token::Colon(inner) => inner.position.clone(),
            Token::DoubleSemi(inner) => inner.position.clone(),
            Token::Comma(inner) => inner.position.clone(),
            Token::Pipe(inner) => inner.position.clone(),
            Token::Semi(inner) => inner.position.clone(),
            Token::Underscore(inner) => inner.position.clone(),
            Token::LParen(inner) => inner.position.clone(),
            Token::RParen(inner) => inner.position.clone(),
            Token::LBracket(inner) => inner.position.clone(),
            Token::RBracket(inner) => inner.position.clone(),
            Token::Plus(inner) => inner.position.clone(),
            Token::Minus(inner) => inner.position.clone(),
            Token::Star(inner) => inner.position.clone(),
            Token::Slash(inner) => inner.position.clone(),
        }
    }

    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        match self {
            Token::Let(_) => "'let'".to_string(),
            Token::Rec(_) => "'rec'".to_string(),
            Token::And(_) => "'and'".to_string(),
            Token::In(_) => "'in'".to_string(),
            Token::Fun(_) => "'fun'".to_string(),
            Token::If(_) => "'if'".to_string(),
            Token::Then(_) => "'then'".to_string(),
            Token::Else(_) => "'else'".to_string(),
            Token::Match(_) => "'match'".to_string(),
            Token::With(_) => "'with'".to_string(),
            Token::True(_) => "'true'".to_string(),
            Token::False(_) => "'false'".to_string(),
            Token::Ident(inner) => format!("identifier '{}'", inner.value),
            Token::Integer(inner) => format!("integer '{}'", inner.value),
            Token::StringLiteral(inner) => format!("string {}", inner.value),
            Token::Arrow(_) => "'->'".to_string(),
            Token::Equals(_) => "'='".to_string(),
            Token::NotEquals(_) => "'<>'".to_string(),
            Token::LessEquals(_) => "'<='".to_string(),
            Token::GreaterEquals(_) => "'>='".to_string(),
            Token::Less(_) => "'<'".to_string(),
            Token::Greater(_) => "'>'".to_string(),
            Token::AndAnd(_) => "'&&'".to_string(),
            Token::DoubleColon(_) => "'::'".to_string(),
            Token::Colon(_) => "':'".to_string(),
            Token::DoubleSemi(_) => "';;'".to_string(),
            Token::Comma(_) => "','".to_string(),
            Token::Pipe(_) => "'|'".to_string(),
            Token::Semi(_) => "';'".to_string(),
            Token::Underscore(_) => "'_'".to_string(),
            Token::LParen(_) => "'('".to_string(),
            Token::RParen(_) => "')'".to_string(),
            Token::LBracket(_) => "'['".to_string(),
            Token::RBracket(_) => "']'".to_string(),
            Token::Plus(_) => "'+'".to_string(),
            Token::Minus(_) => "'-'".to_string(),
            Token::Star(_) => "'*'".to_string(),
            Token::Slash(_) => "'/'".to_string(),
        }
    }
}
