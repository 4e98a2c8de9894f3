//! Top-level declarations of a script.
//!
//! `let`, `const` and `class` at the top of a script live in the global
//! lexical scope, not on `globalThis`, so they cannot be found by listing
//! global properties after evaluation. The source is parsed instead.

use oxc_allocator::Allocator;
use oxc_ast::ast::Statement;
use oxc_parser::Parser;
use oxc_span::SourceType;

/// Names bound by the top-level statements of `source`, in source order.
///
/// Destructuring patterns are skipped. Source that does not parse yields no
/// names; the engine reports the syntax error itself when it runs the file.
pub fn top_level_names(source: &str) -> Vec<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_script(true);

    let parser_ret = Parser::new(&allocator, source, source_type).parse();
    if !parser_ret.errors.is_empty() {
        tracing::debug!(
            "Skipping declaration scan: {} parse error(s)",
            parser_ret.errors.len()
        );
        return Vec::new();
    }

    let mut names = Vec::new();
    for stmt in &parser_ret.program.body {
        match stmt {
            Statement::VariableDeclaration(var_decl) => names.extend(
                var_decl
                    .declarations
                    .iter()
                    .filter_map(|d| d.id.get_binding_identifier().map(|id| id.name.to_string())),
            ),
            Statement::FunctionDeclaration(f) => {
                names.extend(f.id.as_ref().map(|id| id.name.to_string()));
            }
            Statement::ClassDeclaration(c) => {
                names.extend(c.id.as_ref().map(|id| id.name.to_string()));
            }
            _ => {}
        }
    }

    names
}
