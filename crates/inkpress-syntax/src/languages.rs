#![forbid(unsafe_code)]

//! Built-in rule sets.
//!
//! Each language is a priority-ordered table. Comments and multi-character
//! operators are placed above anything that would match a shorter prefix,
//! since the scanner takes the first matching rule rather than the longest.

use crate::error::RuleError;
use crate::rule::RuleSet;
use inkpress_core::token::TokenKind;

// Shared priorities. Gaps leave room for language-specific rules.
const MULTILINE: i32 = 100;
const COMMENT: i32 = 90;
const ANNOTATION: i32 = 85;
const STRING: i32 = 80;
const NUMBER: i32 = 70;
const KEYWORD: i32 = 60;
const CONSTANT: i32 = 55;
const BUILTIN: i32 = 50;
const TYPE: i32 = 45;
const IDENTIFIER: i32 = 40;
const OPERATOR: i32 = 30;
const PUNCTUATION: i32 = 20;
const WHITESPACE: i32 = 10;

const HSPACE: &str = r"[^\S\r\n]+";
const NEWLINE: &str = r"\r?\n";

/// Every built-in rule set.
pub fn builtins() -> Result<Vec<RuleSet>, RuleError> {
    Ok(vec![python()?, javascript()?, rust()?, plain_text()?])
}

// ---------------------------------------------------------------------------
// Python
// ---------------------------------------------------------------------------

const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "match", "case", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with",
    "yield",
];

const PYTHON_BUILTINS: &[&str] = &[
    "abs", "all", "any", "bool", "bytes", "callable", "chr", "dict", "dir", "divmod",
    "enumerate", "filter", "float", "format", "frozenset", "getattr", "hasattr", "hash", "id",
    "input", "int", "isinstance", "issubclass", "iter", "len", "list", "map", "max", "min",
    "next", "object", "open", "ord", "pow", "print", "range", "repr", "reversed", "round", "set",
    "setattr", "slice", "sorted", "str", "sum", "super", "tuple", "type", "vars", "zip", "self",
    "cls",
];

/// Python 3.
pub fn python() -> Result<RuleSet, RuleError> {
    RuleSet::builder("python")
        .aliases(&["py", "python3"])
        .extensions(&["py", "pyi", "pyw"])
        .multiline_escaped(
            TokenKind::String,
            MULTILINE,
            r#"(?i:[rbuf]{0,2})""""#,
            Some(r#"""""#),
            '\\',
        )
        .multiline_escaped(
            TokenKind::String,
            MULTILINE,
            r"(?i:[rbuf]{0,2})'''",
            Some(r"'''"),
            '\\',
        )
        .rule(TokenKind::Comment, COMMENT, r"#[^\r\n]*")
        .rule(
            TokenKind::Annotation,
            ANNOTATION,
            r"@[_\p{L}][_\p{L}\p{N}]*(?:\.[_\p{L}][_\p{L}\p{N}]*)*",
        )
        .rule(
            TokenKind::String,
            STRING,
            r#"(?i:[rbuf]{0,2})(?:"(?:[^"\\\r\n]|\\.)*"?|'(?:[^'\\\r\n]|\\.)*'?)"#,
        )
        .rule(
            TokenKind::Number,
            NUMBER,
            r"0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+|(?:[0-9][0-9_]*\.?[0-9_]*|\.[0-9][0-9_]*)(?:[eE][+-]?[0-9_]+)?[jJ]?",
        )
        .words(TokenKind::Keyword, KEYWORD, PYTHON_KEYWORDS)
        .words(TokenKind::Constant, CONSTANT, &["True", "False", "None", "NotImplemented"])
        .words(TokenKind::Builtin, BUILTIN, PYTHON_BUILTINS)
        .rule(TokenKind::Identifier, IDENTIFIER, r"[_\p{L}][_\p{L}\p{N}]*")
        .rule(
            TokenKind::Operator,
            OPERATOR,
            r"\*\*=?|//=?|>>=?|<<=?|->|:=|[-+*/%@&|^=<>!]=|[-+*/%@&|^~<>=]",
        )
        .rule(TokenKind::Punctuation, PUNCTUATION, r"[()\[\]{}:;,.\\]")
        .rule(TokenKind::Whitespace, WHITESPACE, HSPACE)
        .rule(TokenKind::Whitespace, WHITESPACE, NEWLINE)
        .build()
}

// ---------------------------------------------------------------------------
// JavaScript
// ---------------------------------------------------------------------------

const JS_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "finally", "for", "from", "function",
    "if", "import", "in", "instanceof", "let", "new", "of", "return", "static", "super", "switch",
    "this", "throw", "try", "typeof", "var", "void", "while", "with", "yield",
];

const JS_BUILTINS: &[&str] = &[
    "Array", "Boolean", "Date", "Error", "JSON", "Map", "Math", "Number", "Object", "Promise",
    "Proxy", "Reflect", "RegExp", "Set", "String", "Symbol", "WeakMap", "WeakSet", "console",
    "document", "globalThis", "module", "exports", "parseFloat", "parseInt", "require", "window",
];

/// JavaScript (also used for JSX sources).
pub fn javascript() -> Result<RuleSet, RuleError> {
    RuleSet::builder("javascript")
        .aliases(&["js", "node", "jsx"])
        .extensions(&["js", "mjs", "cjs", "jsx"])
        .multiline(TokenKind::Comment, MULTILINE, r"/\*", Some(r"\*/"))
        .rule(TokenKind::Comment, COMMENT + 5, r"//[^\r\n]*")
        .multiline_escaped(TokenKind::String, COMMENT, "`", None, '\\')
        .rule(
            TokenKind::String,
            STRING,
            r#""(?:[^"\\\r\n]|\\.)*"?|'(?:[^'\\\r\n]|\\.)*'?"#,
        )
        .rule(
            TokenKind::Number,
            NUMBER,
            r"0[xX][0-9a-fA-F_]+n?|0[oO][0-7_]+n?|0[bB][01_]+n?|(?:[0-9][0-9_]*\.?[0-9_]*|\.[0-9][0-9_]*)(?:[eE][+-]?[0-9_]+)?n?",
        )
        .rule(TokenKind::Annotation, KEYWORD + 5, r"@[A-Za-z_$][\w$]*")
        .words(TokenKind::Keyword, KEYWORD, JS_KEYWORDS)
        .words(
            TokenKind::Constant,
            CONSTANT,
            &["true", "false", "null", "undefined", "NaN", "Infinity"],
        )
        .words(TokenKind::Builtin, BUILTIN, JS_BUILTINS)
        .rule(TokenKind::Type, TYPE, r"[A-Z][\w$]*")
        .rule(TokenKind::Identifier, IDENTIFIER, r"[_$\p{L}][\w$]*")
        .rule(
            TokenKind::Operator,
            OPERATOR,
            r">>>=|===|!==|\*\*=|\.\.\.|<<=|>>>|>>=|&&=|\|\|=|\?\?=|=>|\?\.|\?\?|\*\*|\+\+|--|&&|\|\||<<|>>|[-+*/%&|^<>!=]=|[-+*/%&|^~<>!=?:]",
        )
        .rule(TokenKind::Punctuation, PUNCTUATION, r"[()\[\]{};,.]")
        .rule(TokenKind::Whitespace, WHITESPACE, HSPACE)
        .rule(TokenKind::Whitespace, WHITESPACE, NEWLINE)
        .build()
}

// ---------------------------------------------------------------------------
// Rust
// ---------------------------------------------------------------------------

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "type", "unsafe", "use",
    "where", "while",
];

/// Longest hash run recognized in a raw-string delimiter.
const MAX_RAW_STRING_HASHES: usize = 16;

/// Rust.
pub fn rust() -> Result<RuleSet, RuleError> {
    let mut builder = RuleSet::builder("rust")
        .aliases(&["rs"])
        .extensions(&["rs"])
        .multiline(TokenKind::Comment, MULTILINE, r"/\*", Some(r"\*/"))
        .rule(TokenKind::Comment, COMMENT + 5, r"//[^\r\n]*");
    // A raw string closes only on a quote followed by as many hashes as it
    // opened with, so each hash count gets its own rule.
    for count in 1..=MAX_RAW_STRING_HASHES {
        let hashes = "#".repeat(count);
        builder = builder.multiline(
            TokenKind::String,
            COMMENT + 1,
            &format!("b?r{hashes}\""),
            Some(format!("\"{hashes}").as_str()),
        );
    }
    builder
        .multiline(TokenKind::String, COMMENT, r#"b?r""#, Some(r#"""#))
        .multiline_escaped(TokenKind::String, COMMENT, r#"[bc]?""#, Some(r#"""#), '\\')
        .rule(
            TokenKind::String,
            ANNOTATION + 2,
            r#"b?'(?:[^'\\\r\n]|\\(?:[nrt0'"\\]|x[0-9a-fA-F]{2}|u\{[0-9a-fA-F]{1,6}\}))'"#,
        )
        .rule(TokenKind::Annotation, ANNOTATION, r"#!?\[[^\]\r\n]*\]")
        .rule(TokenKind::Annotation, STRING, r"'[_\p{L}][_\p{L}\p{N}]*")
        .rule(
            TokenKind::Number,
            NUMBER,
            r"(?:0x[0-9a-fA-F_]+|0o[0-7_]+|0b[01_]+|[0-9][0-9_]*(?:\.[0-9][0-9_]*)?(?:[eE][+-]?[0-9_]+)?)(?:[iu](?:8|16|32|64|128|size)|f32|f64)?",
        )
        .words(TokenKind::Keyword, KEYWORD, RUST_KEYWORDS)
        .words(TokenKind::Constant, CONSTANT, &["true", "false"])
        .words(
            TokenKind::Builtin,
            BUILTIN,
            &["Some", "None", "Ok", "Err", "Box", "Option", "Result", "String", "Vec"],
        )
        .rule(TokenKind::Builtin, BUILTIN, r"[_\p{L}][_\p{L}\p{N}]*!")
        .rule(TokenKind::Type, TYPE, r"[A-Z][_\p{L}\p{N}]*")
        .rule(TokenKind::Identifier, IDENTIFIER, r"[_\p{L}][_\p{L}\p{N}]*")
        .rule(
            TokenKind::Operator,
            OPERATOR,
            r">>=|<<=|\.\.=|\.\.\.|\.\.|::|->|=>|&&|\|\||<<|>>|[-+*/%&|^<>!=]=|[-+*/%&|^!<>=?@]",
        )
        .rule(TokenKind::Punctuation, PUNCTUATION, r"[()\[\]{};,.:#$]")
        .rule(TokenKind::Whitespace, WHITESPACE, HSPACE)
        .rule(TokenKind::Whitespace, WHITESPACE, NEWLINE)
        .build()
}

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

/// Words and whitespace, nothing else.
pub fn plain_text() -> Result<RuleSet, RuleError> {
    RuleSet::builder("text")
        .aliases(&["plain", "plaintext", "txt"])
        .extensions(&["txt", "text", "log"])
        .rule(TokenKind::Identifier, PUNCTUATION, r"\S+")
        .rule(TokenKind::Whitespace, WHITESPACE, HSPACE)
        .rule(TokenKind::Whitespace, WHITESPACE, NEWLINE)
        .build()
}
