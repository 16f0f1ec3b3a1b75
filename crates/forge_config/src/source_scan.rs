//! Discovery of the module a component's HDL source declares.

use std::path::Path;

use forge_emit::ModuleNameResolver;
use forge_ir::{Component, IntegrationError};

use crate::error::LoadError;

/// Reads each component's source file and returns the first module it declares.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceModuleScanner;

impl SourceModuleScanner {
    /// Scans one source file.
    pub fn scan_file(&self, path: &Path) -> Result<String, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        scan_module_name(&text).ok_or_else(|| LoadError::MissingModule {
            path: path.to_path_buf(),
        })
    }
}

impl ModuleNameResolver for SourceModuleScanner {
    fn module_name(&self, component: &Component) -> Result<String, IntegrationError> {
        self.scan_file(Path::new(&component.source_reference))
            .map_err(|e| IntegrationError::ModuleNameUnavailable {
                instance: component.name.clone(),
                reason: e.to_string(),
            })
    }
}

/// Returns the identifier following the first `module` keyword.
///
/// Line and block comments are skipped. Lifetime qualifiers (`automatic`,
/// `static`) between the keyword and the name are ignored.
pub fn scan_module_name(text: &str) -> Option<String> {
    let code = strip_comments(text);
    let mut after_keyword = false;
    for token in code.split_whitespace() {
        if !after_keyword {
            after_keyword = token == "module";
            continue;
        }
        if token == "automatic" || token == "static" {
            continue;
        }
        let ident: String = token
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
            .collect();
        return (!ident.is_empty()).then_some(ident);
    }
    None
}

/// Replaces every `//` and `/* */` comment with a single space.
///
/// An unterminated block comment runs to the end of the text.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(slash) = rest.find('/') {
        let (code, tail) = rest.split_at(slash);
        out.push_str(code);
        if let Some(comment) = tail.strip_prefix("//") {
            rest = comment.find('\n').map_or("", |end| &comment[end..]);
            out.push(' ');
        } else if let Some(comment) = tail.strip_prefix("/*") {
            rest = comment.find("*/").map_or("", |end| &comment[end + 2..]);
            out.push(' ');
        } else {
            out.push('/');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn simple_module() {
        assert_eq!(
            scan_module_name("module counter (\n  input logic clk\n);\nendmodule\n").as_deref(),
            Some("counter")
        );
    }

    #[test]
    fn name_glued_to_parameter_list() {
        assert_eq!(
            scan_module_name("module fifo#(parameter W = 8)(input clk);").as_deref(),
            Some("fifo")
        );
        assert_eq!(scan_module_name("module dma(").as_deref(), Some("dma"));
    }

    #[test]
    fn keyword_and_name_on_separate_lines() {
        let text = "// module not_this_one\n`timescale 1ns/1ps\nmodule\n  automatic\n  real_one;\n";
        assert_eq!(scan_module_name(text).as_deref(), Some("real_one"));
    }

    #[test]
    fn block_comments_are_skipped() {
        let text = "/* module old_name (\n   input clk\n); */\nmodule/*inline*/new_name (input clk);\n";
        assert_eq!(scan_module_name(text).as_deref(), Some("new_name"));
        assert_eq!(scan_module_name("/* module never_closed\n"), None);
        assert_eq!(
            scan_module_name("module top; // a / b\nendmodule").as_deref(),
            Some("top")
        );
    }

    #[test]
    fn endmodule_is_not_a_declaration() {
        assert_eq!(scan_module_name("endmodule\n"), None);
        assert_eq!(scan_module_name(""), None);
    }

    #[test]
    fn resolver_reads_source_reference() {
        let dir = tempfile::TempDir::new().unwrap();
        let src = dir.path().join("producer.sv");
        fs::write(&src, "module axis_producer (input logic clk);\nendmodule\n").unwrap();

        let component = Component::new("a", "a.json", src.to_string_lossy());
        assert_eq!(
            SourceModuleScanner.module_name(&component).unwrap(),
            "axis_producer"
        );
    }

    #[test]
    fn resolver_reports_missing_file_and_module() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = Component::new("a", "a.json", dir.path().join("nope.sv").to_string_lossy());
        assert!(matches!(
            SourceModuleScanner.module_name(&missing),
            Err(IntegrationError::ModuleNameUnavailable { ref instance, .. }) if instance == "a"
        ));

        let empty = dir.path().join("empty.sv");
        fs::write(&empty, "// nothing here\n").unwrap();
        assert!(matches!(
            SourceModuleScanner.scan_file(&empty),
            Err(LoadError::MissingModule { .. })
        ));
    }
}
